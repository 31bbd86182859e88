use std::{
    sync::mpsc::{SendError, Sender},
    thread::{self, JoinHandle},
};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use gridfall_engine::Button;

use crate::keybinds_presets::{normalize, Keybinds};

pub enum LiveTermSignal {
    RecognizedButton(Button),
    RawEvent(Event),
}

pub fn spawn(input_sender: Sender<LiveTermSignal>, keybinds: Keybinds) -> JoinHandle<()> {
    thread::spawn(move || {
        'detect_events: loop {
            // Read event.
            match event::read() {
                Ok(event) => {
                    let mut stop_thread = false;

                    let signal = match event {
                        Event::Key(KeyEvent {
                            code,
                            modifiers,
                            kind,
                            ..
                        }) => {
                            // We only care about keydowns; some terminals still
                            // send release events we must not re-interpret.
                            if !matches!(kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                                continue 'detect_events;
                            }

                            let escape = matches!(code, event::KeyCode::Esc);
                            let ctrl_c = matches!(code, event::KeyCode::Char('c'))
                                && matches!(modifiers, event::KeyModifiers::CONTROL);

                            // The game loop leaves on these; so do we.
                            if escape || ctrl_c {
                                stop_thread = true;
                            }

                            match keybinds.get(&normalize((code, modifiers))) {
                                // No binding: just transmit whatever the event was.
                                None => LiveTermSignal::RawEvent(event),

                                // Binding found: send the button press.
                                Some(&button) => LiveTermSignal::RecognizedButton(button),
                            }
                        }

                        // Not a key event, just send directly.
                        _ => LiveTermSignal::RawEvent(event),
                    };

                    // Send signal.
                    match input_sender.send(signal) {
                        Ok(()) => {}
                        Err(SendError(_event_which_failed_to_transmit)) => {
                            break 'detect_events;
                        }
                    }

                    if stop_thread {
                        break 'detect_events;
                    }
                }

                Err(_e) => {}
            }
        }
    })
}
