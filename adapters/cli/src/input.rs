//! Keyboard reader running beside the simulation loop.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use maze_chase_core::{Direction, IntentSlot};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What a key press asks the game to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyIntent {
    /// Steer the player.
    Move(Direction),
    /// Leave the game.
    Quit,
}

/// Maps a terminal key event onto a game intent.
///
/// Releases and repeats are ignored so a held key does not queue work.
pub(crate) fn intent_for(key: KeyEvent) -> Option<KeyIntent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(KeyIntent::Quit);
    }

    let intent = match key.code {
        KeyCode::Char('w' | 'W') | KeyCode::Up => KeyIntent::Move(Direction::Up),
        KeyCode::Char('a' | 'A') | KeyCode::Left => KeyIntent::Move(Direction::Left),
        KeyCode::Char('s' | 'S') | KeyCode::Down => KeyIntent::Move(Direction::Down),
        KeyCode::Char('d' | 'D') | KeyCode::Right => KeyIntent::Move(Direction::Right),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => KeyIntent::Quit,
        _ => return None,
    };
    Some(intent)
}

/// Handle to the background keyboard reader.
#[derive(Debug)]
pub(crate) struct InputThread {
    handle: JoinHandle<Result<()>>,
}

impl InputThread {
    /// Waits for the reader to observe the quit flag and exit.
    pub(crate) fn join(self) -> Result<()> {
        self.handle
            .join()
            .map_err(|_| anyhow!("keyboard reader panicked"))?
    }
}

/// Starts reading keys into `slot` until a quit is requested from either side.
pub(crate) fn spawn(slot: Arc<IntentSlot>) -> Result<InputThread> {
    let handle = thread::Builder::new()
        .name("maze-chase-input".to_owned())
        .spawn(move || read_keys(&slot))
        .context("failed to spawn keyboard reader")?;
    Ok(InputThread { handle })
}

fn read_keys(slot: &IntentSlot) -> Result<()> {
    pump(slot, || {
        if !event::poll(POLL_INTERVAL).context("failed to poll terminal events")? {
            return Ok(None);
        }
        event::read()
            .map(Some)
            .context("failed to read terminal event")
    })
}

/// Feeds events from `next` into the slot until a quit is requested.
///
/// A failing source also requests a quit so the loop does not keep running
/// without input.
fn pump<F>(slot: &IntentSlot, mut next: F) -> Result<()>
where
    F: FnMut() -> Result<Option<TermEvent>>,
{
    while !slot.quit_requested() {
        let event = match next() {
            Ok(event) => event,
            Err(err) => {
                tracing::error!(?err, "keyboard reader stopped");
                slot.request_quit();
                return Err(err);
            }
        };
        let Some(TermEvent::Key(key)) = event else {
            continue;
        };
        match intent_for(key) {
            Some(KeyIntent::Move(direction)) => slot.set_player_heading(direction),
            Some(KeyIntent::Quit) => {
                tracing::info!("quit requested from keyboard");
                slot.request_quit();
            }
            None => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn letters_and_arrows_steer() {
        assert_eq!(
            intent_for(press(KeyCode::Char('w'))),
            Some(KeyIntent::Move(Direction::Up))
        );
        assert_eq!(
            intent_for(press(KeyCode::Char('A'))),
            Some(KeyIntent::Move(Direction::Left))
        );
        assert_eq!(
            intent_for(press(KeyCode::Down)),
            Some(KeyIntent::Move(Direction::Down))
        );
        assert_eq!(
            intent_for(press(KeyCode::Right)),
            Some(KeyIntent::Move(Direction::Right))
        );
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        assert_eq!(intent_for(press(KeyCode::Char('q'))), Some(KeyIntent::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(intent_for(ctrl_c), Some(KeyIntent::Quit));
        let ctrl_w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(intent_for(ctrl_w), None);
    }

    #[test]
    fn releases_and_unmapped_keys_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('w'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(intent_for(release), None);
        assert_eq!(intent_for(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn pump_stops_on_a_quit_key() {
        let slot = IntentSlot::new();
        let mut keys = vec![
            TermEvent::Key(press(KeyCode::Char('q'))),
            TermEvent::Key(press(KeyCode::Left)),
        ]
        .into_iter();
        pump(&slot, || Ok(keys.next())).expect("clean exit");
        assert!(slot.quit_requested());
        assert_eq!(slot.take_heading(), None);
    }

    #[test]
    fn failing_source_requests_quit() {
        let slot = IntentSlot::new();
        let mut calls = 0;
        let result = pump(&slot, || {
            calls += 1;
            if calls == 1 {
                Ok(Some(TermEvent::Key(press(KeyCode::Up))))
            } else {
                Err(anyhow!("terminal gone"))
            }
        });
        assert!(result.is_err());
        assert!(slot.quit_requested());
        assert_eq!(slot.take_heading(), Some(Direction::Up));
    }
}
