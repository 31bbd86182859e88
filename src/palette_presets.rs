use std::collections::HashMap;

use crossterm::style::Color;
use gridfall_engine::ColorTag;

pub type Palette = HashMap<ColorTag, Color>;

pub fn monochrome_palette() -> Palette {
    HashMap::new()
}

pub fn color16_palette() -> Palette {
    const COLORS_COLOR16: [(ColorTag, Color); 8] = [
        (ColorTag::Cyan, Color::DarkCyan),
        (ColorTag::Blue, Color::Blue),
        (ColorTag::Orange, Color::Red),
        (ColorTag::Yellow, Color::Yellow),
        (ColorTag::Green, Color::Green),
        (ColorTag::Purple, Color::DarkMagenta),
        (ColorTag::Red, Color::DarkRed),
        (ColorTag::Black, Color::DarkGrey),
    ];
    HashMap::from(COLORS_COLOR16)
}

pub fn fullcolor_palette() -> Palette {
    #[rustfmt::skip]
    const COLORS_FULL: [(ColorTag, Color); 8] = [
        (ColorTag::Cyan,   Color::Rgb{r:  0,g:255,b:255}), // #00FFFF
        (ColorTag::Blue,   Color::Rgb{r:  0,g:  0,b:255}), // #0000FF
        (ColorTag::Orange, Color::Rgb{r:255,g:127,b:  0}), // #FF7F00
        (ColorTag::Yellow, Color::Rgb{r:255,g:255,b:  0}), // #FFFF00
        (ColorTag::Green,  Color::Rgb{r:  0,g:255,b:  0}), // #00FF00
        (ColorTag::Purple, Color::Rgb{r:128,g:  0,b:128}), // #800080
        (ColorTag::Red,    Color::Rgb{r:255,g:  0,b:  0}), // #FF0000
        (ColorTag::Black,  Color::Rgb{r:127,g:127,b:127}), // #7F7F7F
    ];
    HashMap::from(COLORS_FULL)
}

pub fn palette_slots() -> Vec<(String, Palette)> {
    vec![
        ("Monochrome".to_owned(), monochrome_palette()),
        ("16-color".to_owned(), color16_palette()),
        ("Fullcolor".to_owned(), fullcolor_palette()),
    ]
}
