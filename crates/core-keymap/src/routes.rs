//! Built-in key bindings.

use crate::{ActionId, ActionToken, RouteError, Router};
use core_state::Mode;

use ActionToken::{Plain, Shift};

/// The standard vim-style table.
pub fn default_router() -> Result<Router, RouteError> {
    let mut r = Router::new();

    // Named keys
    r.code("end", "end")?
        .action(Plain, ActionId::MoveToCurrentLineTail)?;
    r.code("home", "home")?
        .action(Plain, ActionId::MoveToCurrentLineHead)?;
    r.code("arrowleft", "arrowleft")?
        .action(Plain, ActionId::SelectPrevCharacter)?;
    r.code("arrowright", "arrowright")?
        .action(Plain, ActionId::SelectNextCharacter)?;
    r.code("arrowup", "arrowup")?
        .action(Plain, ActionId::SelectPrevLine)?;
    r.code("arrowdown", "arrowdown")?
        .action(Plain, ActionId::SelectNextLine)?;
    r.code("enter", "enter")?
        .action(Plain, ActionId::SelectNextLine)?;
    r.code("insert", "insert")?
        .action_then(Plain, ActionId::Insert, Mode::Edit)?;
    r.code("delete", "delete")?
        .record()
        .action_then(Plain, ActionId::DeleteSelected, Mode::General)?;

    // Motions
    r.code("0", "0")?
        .action(Plain, ActionId::MoveToCurrentLineHead)?;
    r.code("4", "4")?
        .action(Shift, ActionId::MoveToCurrentLineTail)?;
    r.code("h", "h")?
        .action(Plain, ActionId::SelectPrevCharacter)?;
    r.code("j", "j")?.action(Plain, ActionId::SelectNextLine)?;
    r.code("k", "k")?.action(Plain, ActionId::SelectPrevLine)?;
    r.code("l", "l")?
        .action(Plain, ActionId::SelectNextCharacter)?;
    r.code("w", "w")?
        .action(Plain, ActionId::MoveToNextWord)?
        .action(Shift, ActionId::MoveToNextWord)?;
    r.code("g", "g")?.action(Shift, ActionId::MoveToLastLine)?;
    r.code("g_g", "gg")?
        .action(Plain, ActionId::MoveToFirstLine)?;

    // Entering Edit mode
    r.code("a", "a")?
        .action_then(Plain, ActionId::Append, Mode::Edit)?
        .action_then(Shift, ActionId::AppendLineTail, Mode::Edit)?;
    r.code("i", "i")?
        .action_then(Plain, ActionId::Insert, Mode::Edit)?
        .action_then(Shift, ActionId::InsertLineHead, Mode::Edit)?;
    r.code("o", "o")?
        .record()
        .action_then(Plain, ActionId::AppendNewLine, Mode::Edit)?
        .action_then(Shift, ActionId::InsertNewLine, Mode::Edit)?;
    r.code("s", "s")?
        .record()
        .action_then(Plain, ActionId::Substitute, Mode::Edit)?;

    // Editing
    r.code("r", "r")?.action(Plain, ActionId::ReplaceChar)?;
    r.code("x", "x")?
        .record()
        .action_then(Plain, ActionId::DeleteSelected, Mode::General)?
        .action(Shift, ActionId::DeletePrevious)?;
    r.code("d", "d")?
        .mode(Mode::Visual)
        .record()
        .action_then(Plain, ActionId::DeleteSelected, Mode::General)?;
    r.code("d_d", "dd")?
        .record()
        .action(Plain, ActionId::DeleteCurrentLine)?;
    r.code("d_w", "dw")?
        .record()
        .action(Plain, ActionId::DeleteWord)?;
    r.code("y", "y")?
        .mode(Mode::Visual)
        .action_then(Plain, ActionId::CopyChar, Mode::General)?;
    r.code("y_y", "yy")?
        .action(Plain, ActionId::CopyCurrentLine)?;
    r.code("y_w", "yw")?.action(Plain, ActionId::CopyWord)?;
    r.code("p", "p")?
        .record()
        .action(Plain, ActionId::PasteAfter)?
        .action(Shift, ActionId::PasteBefore)?;
    r.code("u", "u")?.action(Plain, ActionId::BackToHistory)?;

    // Visual
    r.code("v", "v")?
        .action(Plain, ActionId::SwitchModeToVisual)?
        .action(Shift, ActionId::SwitchModeToVisual)?;

    Ok(r)
}
