/// Integration tests: end-to-end scenarios and the MCP surface
mod scenarios;
mod server_flow;
