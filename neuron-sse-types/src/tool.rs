use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of tool a [`crate::ToolStatusEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    /// Built-in web search.
    WebSearch,
    /// Built-in file search over an attached vector store.
    FileSearch,
    /// Built-in code interpreter.
    CodeInterpreter,
    /// Built-in image generation.
    ImageGeneration,
    /// A user-defined function tool.
    Function,
    /// A tool served over the Model Context Protocol.
    Mcp,
    /// A function tool upgraded to represent a nested agent invocation.
    Agent,
}

/// Narrower tool-type union used on `tool.arguments.*` events, which only
/// ever carry a callable (function/mcp) or an agent-upgraded callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgsToolType {
    /// A user-defined function tool.
    Function,
    /// A tool served over the Model Context Protocol.
    Mcp,
    /// A function tool upgraded to represent a nested agent invocation.
    Agent,
}

/// Status values shared by the search-family tools (web and file search).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Search has been requested but has not started producing results.
    InProgress,
    /// Search is actively running (web search only).
    Searching,
    /// Search has finished.
    Completed,
}

/// Status values for the code interpreter tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeInterpreterStatus {
    /// The interpreter call has started.
    InProgress,
    /// Code is actively executing.
    Interpreting,
    /// Execution has finished.
    Completed,
}

/// Status values for the image generation tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageGenerationStatus {
    /// The call has started.
    InProgress,
    /// An image is actively being generated.
    Generating,
    /// A partial preview frame is available.
    PartialImage,
    /// Generation has finished.
    Completed,
}

/// Status values for function and agent tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionToolStatus {
    /// The call has started and arguments are streaming or executing.
    InProgress,
    /// The call finished successfully.
    Completed,
    /// The call failed.
    Failed,
}

/// Status values for MCP tools, which additionally support an approval gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpToolStatus {
    /// A human approval is required before the call proceeds.
    AwaitingApproval,
    /// The call has started.
    InProgress,
    /// The call finished successfully.
    Completed,
    /// The call failed.
    Failed,
}

/// A single result entry returned by a file-search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSearchResult {
    /// Identifier of the matched file.
    pub file_id: String,
    /// Original filename, if known.
    pub filename: Option<String>,
    /// Relevance score, if the provider supplied one.
    pub score: Option<f64>,
    /// Identifier of the vector store the match came from.
    pub vector_store_id: Option<String>,
    /// Arbitrary provider-supplied attributes for the match.
    pub attributes: Option<Value>,
    /// Matched text excerpt, truncated to the configured cap.
    pub text: Option<String>,
}

/// A web search tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchTool {
    /// Identifier of the tool call.
    pub tool_call_id: String,
    /// Current status.
    pub status: SearchStatus,
    /// The search query, if known.
    pub query: Option<String>,
    /// URLs of sources found so far.
    pub sources: Option<Vec<String>>,
}

/// A file search tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSearchTool {
    /// Identifier of the tool call.
    pub tool_call_id: String,
    /// Current status.
    pub status: SearchStatus,
    /// Queries issued so far.
    pub queries: Option<Vec<String>>,
    /// Results found so far, capped and truncated.
    pub results: Option<Vec<FileSearchResult>>,
}

/// A code interpreter tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeInterpreterTool {
    /// Identifier of the tool call.
    pub tool_call_id: String,
    /// Current status.
    pub status: CodeInterpreterStatus,
    /// Identifier of the sandbox container running the code.
    pub container_id: Option<String>,
    /// Whether the container was auto-provisioned or explicitly chosen.
    pub container_mode: Option<String>,
}

/// An image generation tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationTool {
    /// Identifier of the tool call.
    pub tool_call_id: String,
    /// Current status.
    pub status: ImageGenerationStatus,
    /// Prompt actually used, if the provider revised it.
    pub revised_prompt: Option<String>,
    /// Output image format (e.g. `"png"`).
    pub format: Option<String>,
    /// Output image size (e.g. `"1024x1024"`).
    pub size: Option<String>,
    /// Output quality setting.
    pub quality: Option<String>,
    /// Output background setting.
    pub background: Option<String>,
    /// Index of the partial preview frame, when `status = partial_image`.
    pub partial_image_index: Option<u32>,
}

/// A user-defined function tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    /// Identifier of the tool call.
    pub tool_call_id: String,
    /// Current status.
    pub status: FunctionToolStatus,
    /// Name of the function.
    pub name: String,
    /// Raw accumulated arguments text, if applicable to this event.
    pub arguments_text: Option<String>,
    /// Parsed arguments, if they parsed to a JSON object.
    pub arguments_json: Option<Value>,
    /// Function output, once available.
    pub output: Option<Value>,
}

/// An MCP tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpTool {
    /// Identifier of the tool call.
    pub tool_call_id: String,
    /// Current status.
    pub status: McpToolStatus,
    /// Name of the MCP tool.
    pub tool_name: String,
    /// Label of the MCP server hosting the tool.
    pub server_label: Option<String>,
    /// Raw accumulated arguments text, if applicable to this event.
    pub arguments_text: Option<String>,
    /// Parsed arguments, if they parsed to a JSON object.
    pub arguments_json: Option<Value>,
    /// Tool output, once available.
    pub output: Option<Value>,
}

/// A function tool upgraded to represent a nested agent invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTool {
    /// Identifier of the tool call.
    pub tool_call_id: String,
    /// Current status.
    pub status: FunctionToolStatus,
    /// Name of the underlying function tool that was upgraded.
    pub name: String,
    /// Name of the nested agent, if resolved.
    pub agent: Option<String>,
}

/// Union of every tool payload shape carried by `tool.status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool_type", rename_all = "snake_case")]
pub enum PublicTool {
    /// See [`WebSearchTool`].
    WebSearch(WebSearchTool),
    /// See [`FileSearchTool`].
    FileSearch(FileSearchTool),
    /// See [`CodeInterpreterTool`].
    CodeInterpreter(CodeInterpreterTool),
    /// See [`ImageGenerationTool`].
    ImageGeneration(ImageGenerationTool),
    /// See [`FunctionTool`].
    Function(FunctionTool),
    /// See [`McpTool`].
    Mcp(McpTool),
    /// See [`AgentTool`].
    Agent(AgentTool),
}
