use serde::{Deserialize, Serialize};

/// A citation pointing at an external URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlCitation {
    /// Character offset in the message text where the citation begins.
    pub start_index: u32,
    /// Character offset in the message text where the citation ends.
    pub end_index: u32,
    /// Page title, if the provider supplied one.
    pub title: Option<String>,
    /// The cited URL.
    pub url: String,
}

/// A citation pointing at a file produced inside a code-interpreter container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerFileCitation {
    /// Character offset in the message text where the citation begins.
    pub start_index: u32,
    /// Character offset in the message text where the citation ends.
    pub end_index: u32,
    /// Identifier of the container the file lives in.
    pub container_id: String,
    /// Identifier of the file within the container.
    pub file_id: String,
    /// Original filename, if known.
    pub filename: Option<String>,
    /// Download URL. Synthesized from `container_id`/`file_id` when the
    /// provider did not supply one directly.
    pub url: Option<String>,
}

/// A citation pointing at an uploaded file (e.g. a file-search result).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCitation {
    /// Character offset in the message text where the citation begins.
    pub start_index: Option<u32>,
    /// Character offset in the message text where the citation ends.
    pub end_index: Option<u32>,
    /// Position among sibling citations, if the provider numbers them.
    pub index: Option<u32>,
    /// Identifier of the cited file.
    pub file_id: String,
    /// Original filename, if known.
    pub filename: Option<String>,
}

/// Union of all citation shapes a [`crate::MessageCitationEvent`] may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PublicCitation {
    /// A link to an external page.
    #[serde(rename = "url_citation")]
    Url(UrlCitation),
    /// A link to a code-interpreter container file.
    #[serde(rename = "container_file_citation")]
    ContainerFile(ContainerFileCitation),
    /// A link to an uploaded file.
    #[serde(rename = "file_citation")]
    File(FileCitation),
}
