//! Per-scope mutable state the projector threads through every handler.

use std::collections::HashMap;

use neuron_sse_types::{
    AgentTool, CodeInterpreterStatus, CodeInterpreterTool, FileSearchResult, FileSearchTool,
    FunctionTool, FunctionToolStatus, ImageGenerationStatus, ImageGenerationTool,
    LifecycleStatus, McpTool, McpToolStatus, MessageAttachment, PublicTool, SearchStatus,
    ToolType, WebSearchTool,
};

/// Per-`tool_call_id` accumulated state.
#[derive(Debug, Clone)]
pub struct ToolState {
    /// What kind of tool this is. May upgrade `Function -> Agent` once
    /// metadata reveals it, per invariant 6.
    pub tool_type: ToolType,
    /// Position of the tool's output item, cached once known.
    pub output_index: Option<u32>,
    /// Tool or function name, once known.
    pub tool_name: Option<String>,
    /// MCP server label, if applicable.
    pub server_label: Option<String>,
    /// Resolved agent name, once the tool is upgraded to `Agent`.
    pub agent_name: Option<String>,
    /// Last status string observed for this tool.
    pub last_status: Option<String>,
    /// Accumulated, not-yet-flushed raw arguments text.
    pub arguments_text: String,
    /// Search query, for web/file search tools.
    pub query: Option<String>,
    /// Source URLs collected for a web search tool.
    pub sources: Vec<String>,
    /// Queries issued so far, for a file search tool.
    pub file_search_queries: Vec<String>,
    /// Results collected so far, for a file search tool.
    pub file_search_results: Vec<FileSearchResult>,
    /// Sandbox container id, for a code interpreter tool.
    pub container_id: Option<String>,
    /// Sandbox container provisioning mode, for a code interpreter tool.
    pub container_mode: Option<String>,
    /// Revised prompt, for an image generation tool.
    pub image_revised_prompt: Option<String>,
    /// Output format, for an image generation tool.
    pub image_format: Option<String>,
    /// Output size, for an image generation tool.
    pub image_size: Option<String>,
    /// Output quality, for an image generation tool.
    pub image_quality: Option<String>,
    /// Output background, for an image generation tool.
    pub image_background: Option<String>,
    /// Index of the most recent partial preview frame.
    pub image_partial_image_index: Option<u32>,
    /// Whether a `tool.status` has already been emitted for this tool's
    /// initial `in_progress` transition (used to avoid re-announcing it).
    pub in_progress_announced: bool,
}

impl ToolState {
    /// Creates fresh state for a tool observed for the first time.
    #[must_use]
    pub fn new(tool_type: ToolType) -> Self {
        Self {
            tool_type,
            output_index: None,
            tool_name: None,
            server_label: None,
            agent_name: None,
            last_status: None,
            arguments_text: String::new(),
            query: None,
            sources: Vec::new(),
            file_search_queries: Vec::new(),
            file_search_results: Vec::new(),
            container_id: None,
            container_mode: None,
            image_revised_prompt: None,
            image_format: None,
            image_size: None,
            image_quality: None,
            image_background: None,
            image_partial_image_index: None,
            in_progress_announced: false,
        }
    }

    /// Classifies the image generation status string, defaulting unknown
    /// values to `in_progress` rather than rejecting the frame.
    #[must_use]
    pub fn classify_image_status(status: Option<&str>) -> ImageGenerationStatus {
        match status {
            Some("generating") => ImageGenerationStatus::Generating,
            Some("partial_image") => ImageGenerationStatus::PartialImage,
            Some("completed") => ImageGenerationStatus::Completed,
            _ => ImageGenerationStatus::InProgress,
        }
    }

    fn function_status(&self) -> FunctionToolStatus {
        match self.last_status.as_deref() {
            Some("completed") => FunctionToolStatus::Completed,
            Some("failed") => FunctionToolStatus::Failed,
            _ => FunctionToolStatus::InProgress,
        }
    }

    fn mcp_status(&self) -> McpToolStatus {
        match self.last_status.as_deref() {
            Some("awaiting_approval") => McpToolStatus::AwaitingApproval,
            Some("completed") => McpToolStatus::Completed,
            Some("failed") => McpToolStatus::Failed,
            _ => McpToolStatus::InProgress,
        }
    }

    fn search_status(&self) -> SearchStatus {
        match self.last_status.as_deref() {
            Some("searching") => SearchStatus::Searching,
            Some("completed") => SearchStatus::Completed,
            _ => SearchStatus::InProgress,
        }
    }

    fn code_interpreter_status(&self) -> CodeInterpreterStatus {
        match self.last_status.as_deref() {
            Some("interpreting") => CodeInterpreterStatus::Interpreting,
            Some("completed") => CodeInterpreterStatus::Completed,
            _ => CodeInterpreterStatus::InProgress,
        }
    }

    fn image_status(&self) -> ImageGenerationStatus {
        Self::classify_image_status(self.last_status.as_deref())
    }

    /// Renders the current state as the public tool-status payload for
    /// `tool_call_id`, matching on [`Self::tool_type`].
    #[must_use]
    pub fn to_public_tool(&self, tool_call_id: &str) -> PublicTool {
        match self.tool_type {
            ToolType::WebSearch => PublicTool::WebSearch(WebSearchTool {
                tool_call_id: tool_call_id.to_string(),
                status: self.search_status(),
                query: self.query.clone(),
                sources: if self.sources.is_empty() { None } else { Some(self.sources.clone()) },
            }),
            ToolType::FileSearch => PublicTool::FileSearch(FileSearchTool {
                tool_call_id: tool_call_id.to_string(),
                status: self.search_status(),
                queries: if self.file_search_queries.is_empty() {
                    None
                } else {
                    Some(self.file_search_queries.clone())
                },
                results: if self.file_search_results.is_empty() {
                    None
                } else {
                    Some(self.file_search_results.clone())
                },
            }),
            ToolType::CodeInterpreter => PublicTool::CodeInterpreter(CodeInterpreterTool {
                tool_call_id: tool_call_id.to_string(),
                status: self.code_interpreter_status(),
                container_id: self.container_id.clone(),
                container_mode: self.container_mode.clone(),
            }),
            ToolType::ImageGeneration => PublicTool::ImageGeneration(ImageGenerationTool {
                tool_call_id: tool_call_id.to_string(),
                status: self.image_status(),
                revised_prompt: self.image_revised_prompt.clone(),
                format: self.image_format.clone(),
                size: self.image_size.clone(),
                quality: self.image_quality.clone(),
                background: self.image_background.clone(),
                partial_image_index: self.image_partial_image_index,
            }),
            ToolType::Function => PublicTool::Function(FunctionTool {
                tool_call_id: tool_call_id.to_string(),
                status: self.function_status(),
                name: self.tool_name.clone().unwrap_or_else(|| "unknown".to_string()),
                arguments_text: None,
                arguments_json: None,
                output: None,
            }),
            ToolType::Mcp => PublicTool::Mcp(McpTool {
                tool_call_id: tool_call_id.to_string(),
                status: self.mcp_status(),
                tool_name: self.tool_name.clone().unwrap_or_else(|| "unknown".to_string()),
                server_label: self.server_label.clone(),
                arguments_text: None,
                arguments_json: None,
                output: None,
            }),
            ToolType::Agent => PublicTool::Agent(AgentTool {
                tool_call_id: tool_call_id.to_string(),
                status: self.function_status(),
                name: self.tool_name.clone().unwrap_or_else(|| "unknown".to_string()),
                agent: self.agent_name.clone(),
            }),
        }
    }
}

/// Per-scope translation state: one instance for the top-level response,
/// and one more per `agent_tool` sub-stream.
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Most recently observed lifecycle status for this scope.
    pub lifecycle_status: Option<LifecycleStatus>,
    /// Accumulated reasoning-summary text.
    pub reasoning_summary_text: String,
    /// Accumulated refusal text.
    pub refusal_text: String,
    /// Per-tool-call accumulated state, keyed by `tool_call_id`.
    pub tool_state: HashMap<String, ToolState>,
    /// Tool call id of the most recently active web-search tool, used to
    /// attach late-arriving URL citations.
    pub last_web_search_tool_call_id: Option<String>,
    /// Deduplicated attachments, in first-seen order. Only meaningful on the
    /// top-level state, per invariant 8.
    pub attachments: Vec<MessageAttachment>,
    /// Object ids already inserted into `attachments`.
    pub seen_attachment_ids: std::collections::HashSet<String>,
    /// Name of the currently active agent.
    pub current_agent: Option<String>,
    /// Number of agent handoffs observed so far.
    pub handoff_count: u32,
    /// Whether a terminal event (`final` or `error`) has already been
    /// emitted. Only meaningful on the top-level state, per invariant 8.
    pub terminal_emitted: bool,
}

impl ProjectionState {
    /// Builds a fresh, empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lifecycle_status: None,
            reasoning_summary_text: String::new(),
            refusal_text: String::new(),
            tool_state: HashMap::new(),
            last_web_search_tool_call_id: None,
            attachments: Vec::new(),
            seen_attachment_ids: std::collections::HashSet::new(),
            current_agent: None,
            handoff_count: 0,
            terminal_emitted: false,
        }
    }
}

impl Default for ProjectionState {
    fn default() -> Self {
        Self::new()
    }
}
