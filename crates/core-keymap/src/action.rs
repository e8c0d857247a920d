//! Action identifiers bound by the route table.

/// Every handler the dispatcher knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    SelectPrevCharacter,
    SelectNextCharacter,
    SelectPrevLine,
    SelectNextLine,
    MoveToCurrentLineHead,
    MoveToCurrentLineTail,
    MoveToFirstLine,
    MoveToLastLine,
    MoveToNextWord,
    Append,
    AppendLineTail,
    Insert,
    InsertLineHead,
    AppendNewLine,
    InsertNewLine,
    /// `x` / Visual `d`: delete the selection.
    DeleteSelected,
    /// `X`: delete the character before the caret.
    DeletePrevious,
    DeleteCurrentLine,
    DeleteWord,
    CopyChar,
    CopyCurrentLine,
    CopyWord,
    PasteAfter,
    PasteBefore,
    /// `u`: restore the newest history snapshot.
    BackToHistory,
    SwitchModeToVisual,
    ReplaceChar,
    Substitute,
}

impl ActionId {
    pub fn name(&self) -> &'static str {
        match self {
            ActionId::SelectPrevCharacter => "select_prev_character",
            ActionId::SelectNextCharacter => "select_next_character",
            ActionId::SelectPrevLine => "select_prev_line",
            ActionId::SelectNextLine => "select_next_line",
            ActionId::MoveToCurrentLineHead => "move_to_current_line_head",
            ActionId::MoveToCurrentLineTail => "move_to_current_line_tail",
            ActionId::MoveToFirstLine => "move_to_first_line",
            ActionId::MoveToLastLine => "move_to_last_line",
            ActionId::MoveToNextWord => "move_to_next_word",
            ActionId::Append => "append",
            ActionId::AppendLineTail => "append_line_tail",
            ActionId::Insert => "insert",
            ActionId::InsertLineHead => "insert_line_head",
            ActionId::AppendNewLine => "append_new_line",
            ActionId::InsertNewLine => "insert_new_line",
            ActionId::DeleteSelected => "delete_selected",
            ActionId::DeletePrevious => "delete_previous",
            ActionId::DeleteCurrentLine => "delete_current_line",
            ActionId::DeleteWord => "delete_word",
            ActionId::CopyChar => "copy_char",
            ActionId::CopyCurrentLine => "copy_current_line",
            ActionId::CopyWord => "copy_word",
            ActionId::PasteAfter => "paste_after",
            ActionId::PasteBefore => "paste_before",
            ActionId::BackToHistory => "back_to_history",
            ActionId::SwitchModeToVisual => "switch_mode_to_visual",
            ActionId::ReplaceChar => "replace_char",
            ActionId::Substitute => "substitute",
        }
    }
}
