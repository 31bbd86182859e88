use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use gridfall_engine::Button;

pub type Keybinds = HashMap<(KeyCode, KeyModifiers), Button>;

pub fn normalize((mut code, modifiers): (KeyCode, KeyModifiers)) -> (KeyCode, KeyModifiers) {
    // Normalize character enum to store a lowercase `char`.
    if let KeyCode::Char(ref mut char) = code {
        *char = char.to_ascii_lowercase();
    }
    (code, modifiers)
}

pub fn gridfall_default_keybinds() -> Keybinds {
    let keybinds_gridfall: [((KeyCode, KeyModifiers), Button); 6] = [
        (KeyCode::Left, Button::MoveLeft),
        (KeyCode::Right, Button::MoveRight),
        (KeyCode::Char('z'), Button::RotateLeft),
        (KeyCode::Char('x'), Button::RotateRight),
        (KeyCode::Down, Button::DropSoft),
        (KeyCode::Char(' '), Button::DropHard),
    ]
    .map(|(k, b)| ((k, KeyModifiers::NONE), b));
    HashMap::from(keybinds_gridfall)
}

pub fn vim_keybinds() -> Keybinds {
    let keybinds_vim: [((KeyCode, KeyModifiers), Button); 6] = [
        (KeyCode::Char('h'), Button::MoveLeft),
        (KeyCode::Char('l'), Button::MoveRight),
        (KeyCode::Char('a'), Button::RotateLeft),
        (KeyCode::Char('d'), Button::RotateRight),
        (KeyCode::Char('j'), Button::DropSoft),
        (KeyCode::Char('k'), Button::DropHard),
    ]
    .map(|(k, b)| ((k, KeyModifiers::NONE), b));
    HashMap::from(keybinds_vim)
}

/// One compact line naming the key bound to each in-game action.
pub fn keybinds_legend(keybinds: &Keybinds) -> String {
    let name_of = |wanted: Button| {
        keybinds
            .iter()
            .find(|(_, &button)| button == wanted)
            .map(|((code, _), _)| match code {
                KeyCode::Left => "←".to_owned(),
                KeyCode::Right => "→".to_owned(),
                KeyCode::Up => "↑".to_owned(),
                KeyCode::Down => "↓".to_owned(),
                KeyCode::Char(' ') => "Space".to_owned(),
                KeyCode::Char(c) => c.to_string(),
                other => format!("{other:?}"),
            })
            .unwrap_or_else(|| "?".to_owned())
    };
    format!(
        "[{}|{}] move  [{}|{}] rotate  [{}] soft  [{}] hard  [p] pause  [Esc] menu",
        name_of(Button::MoveLeft),
        name_of(Button::MoveRight),
        name_of(Button::RotateLeft),
        name_of(Button::RotateRight),
        name_of(Button::DropSoft),
        name_of(Button::DropHard),
    )
}
