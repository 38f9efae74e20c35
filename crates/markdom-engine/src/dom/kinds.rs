/// How a link or image named its target in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkForm {
    /// `[text](url "alt")`
    Inline,
    /// `[text][id]`
    Reference,
    /// `[text][]`, the visible text doubles as the reference id
    Collapsed,
}

/// Every kind of node in a [`Document`](super::Document) tree.
///
/// Block kinds sit directly under the document root, under a block quote or
/// inside list items; inline kinds live inside blocks. The `marker` fields keep
/// the source character so markdown output writes the same delimiter back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,

    // === Blocks ===
    Header {
        level: usize,
        id: String,
    },
    Paragraph,
    BlockQuote,
    OrderedList {
        /// Indentation width of the markers, tabs counting 4.
        level: usize,
        start: u64,
    },
    BulletList {
        level: usize,
        marker: char,
    },
    ListItem,
    CodeBlock {
        language: String,
        literal: String,
    },
    ThematicBreak,
    Reference {
        reference_id: String,
        url: String,
        alt: String,
    },
    Toc,
    Tof,
    PageBreak,
    LatexBlock {
        literal: String,
        rendered: String,
    },

    // === Inlines ===
    Text {
        value: String,
    },
    Bold {
        marker: char,
    },
    Italics {
        marker: char,
    },
    Strikethrough,
    Link {
        url: String,
        alt: String,
        reference_id: Option<String>,
        form: LinkForm,
    },
    Image {
        url: String,
        alt: String,
        reference_id: Option<String>,
        form: LinkForm,
        /// `Figure N`, numbered in document order.
        id: String,
    },
    InlineCode {
        value: String,
    },
    InlineLatex {
        value: String,
        rendered: String,
    },
    SoftBreak,
}

impl NodeKind {
    pub fn is_list(&self) -> bool {
        matches!(self, NodeKind::OrderedList { .. } | NodeKind::BulletList { .. })
    }

    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text { .. }
                | NodeKind::Bold { .. }
                | NodeKind::Italics { .. }
                | NodeKind::Strikethrough
                | NodeKind::Link { .. }
                | NodeKind::Image { .. }
                | NodeKind::InlineCode { .. }
                | NodeKind::InlineLatex { .. }
                | NodeKind::SoftBreak
        )
    }

    /// The reference a link or image waits on, if any.
    pub fn reference_id(&self) -> Option<&str> {
        match self {
            NodeKind::Link { reference_id, .. } | NodeKind::Image { reference_id, .. } => {
                reference_id.as_deref()
            }
            _ => None,
        }
    }

    /// Copies a resolved definition into a link or image. Other kinds are left alone.
    pub(crate) fn set_target(&mut self, target_url: &str, target_alt: &str) {
        if let NodeKind::Link { url, alt, .. } | NodeKind::Image { url, alt, .. } = self {
            target_url.clone_into(url);
            target_alt.clone_into(alt);
        }
    }
}
