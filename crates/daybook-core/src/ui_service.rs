use daybook_domain::{AppState, UiState};
use uuid::Uuid;

/// Presentation flags for the transaction entry sheet.
pub struct UiService;

impl UiService {
    /// The editing id is kept only while the sheet is open.
    pub fn toggle_transaction_sheet(
        state: &AppState,
        open: bool,
        editing: Option<Uuid>,
    ) -> AppState {
        let mut next = state.clone();
        next.ui = UiState {
            is_transaction_sheet_open: open,
            editing_transaction_id: if open { editing } else { None },
        };
        next
    }
}
