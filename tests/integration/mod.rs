mod basic_integration;
mod mcp_protocol;
mod tool_workflow;
