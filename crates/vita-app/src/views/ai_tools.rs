use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use vita_core::chat::ChatSession;
use vita_core::panels::{ImagePanel, QuickPanel};
use vita_types::ToolSelection;

/// The tool panel currently mounted. The chat panel has no state of its
/// own, its session lives on [`AiTools`].
pub enum ToolPanel {
    Chat,
    Image(Arc<Mutex<ImagePanel>>),
    Quick(Arc<Mutex<QuickPanel>>),
}

impl ToolPanel {
    fn mount(tool: ToolSelection) -> Self {
        match tool {
            ToolSelection::Chat => ToolPanel::Chat,
            ToolSelection::Image => ToolPanel::Image(Arc::new(Mutex::new(ImagePanel::new()))),
            ToolSelection::Quick => ToolPanel::Quick(Arc::new(Mutex::new(QuickPanel::new()))),
        }
    }

    pub fn tool(&self) -> ToolSelection {
        match self {
            ToolPanel::Chat => ToolSelection::Chat,
            ToolPanel::Image(_) => ToolSelection::Image,
            ToolPanel::Quick(_) => ToolSelection::Quick,
        }
    }
}

/// AI tools view: the chat session and one mounted tool panel.
///
/// Requests in flight are never cancelled. Their results are only shown
/// while the token they were started under is still live.
pub struct AiTools {
    chat: Arc<Mutex<ChatSession>>,
    panel: ToolPanel,
    view_mounted: CancellationToken,
    panel_mounted: CancellationToken,
}

impl AiTools {
    pub fn mount() -> Self {
        let view_mounted = CancellationToken::new();
        Self {
            chat: Arc::new(Mutex::new(ChatSession::new())),
            panel: ToolPanel::Chat,
            panel_mounted: view_mounted.child_token(),
            view_mounted,
        }
    }

    pub fn active(&self) -> ToolSelection {
        self.panel.tool()
    }

    pub fn panel(&self) -> &ToolPanel {
        &self.panel
    }

    pub fn chat(&self) -> Arc<Mutex<ChatSession>> {
        self.chat.clone()
    }

    /// Token cancelled when the whole view unmounts
    pub fn view_token(&self) -> CancellationToken {
        self.view_mounted.clone()
    }

    /// Token cancelled when the current panel unmounts
    pub fn panel_token(&self) -> CancellationToken {
        self.panel_mounted.clone()
    }

    /// Swap panels. The old Image/Quick state is discarded, chat stays.
    pub fn select(&mut self, tool: ToolSelection) {
        if self.panel.tool() == tool {
            return;
        }
        self.panel_mounted.cancel();
        self.panel_mounted = self.view_mounted.child_token();
        self.panel = ToolPanel::mount(tool);
    }
}

impl Drop for AiTools {
    fn drop(&mut self) {
        self.view_mounted.cancel();
    }
}
