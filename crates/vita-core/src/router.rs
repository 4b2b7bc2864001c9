use vita_types::{ToolSelection, View};

/// Top-level view and, inside the AI view, the active tool
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ViewRouter {
    view: View,
    tool: ToolSelection,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Active tool, only meaningful while the AI view is shown
    pub fn tool(&self) -> Option<ToolSelection> {
        (self.view == View::Ai).then_some(self.tool)
    }

    /// Returns the view being left, `None` if nothing changed.
    /// Entering the AI view always starts on the chat tool.
    pub fn select_view(&mut self, view: View) -> Option<View> {
        if self.view == view {
            return None;
        }
        let previous = std::mem::replace(&mut self.view, view);
        self.tool = ToolSelection::default();
        Some(previous)
    }

    /// Returns the tool being left. Ignored outside the AI view.
    pub fn select_tool(&mut self, tool: ToolSelection) -> Option<ToolSelection> {
        if self.view != View::Ai || self.tool == tool {
            return None;
        }
        Some(std::mem::replace(&mut self.tool, tool))
    }
}
