//! Terminal input and prompt utilities for the client.

use std::io::Write;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use crate::session::InputEvent;

/// Redisplay the prompt after printing a message
pub fn redisplay_prompt(prompt: &str) {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
}

/// Spawn the blocking stdin reader thread.
///
/// One thread lives for the whole client run and survives reconnects; the
/// channel carries `Quit` when the user leaves with `/quit`, Ctrl+C or
/// Ctrl+D.
pub fn spawn_input_thread(prompt: String) -> mpsc::UnboundedReceiver<InputEvent> {
    let (input_tx, input_rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                let _ = input_tx.send(InputEvent::Quit);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line == "/quit" {
                        let _ = input_tx.send(InputEvent::Quit);
                        break;
                    }
                    rl.add_history_entry(line).ok();
                    if input_tx.send(InputEvent::Line(line.to_string())).is_err() {
                        // Channel closed, exit thread
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    let _ = input_tx.send(InputEvent::Quit);
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    let _ = input_tx.send(InputEvent::Quit);
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    let _ = input_tx.send(InputEvent::Quit);
                    break;
                }
            }
        }
    });

    input_rx
}
