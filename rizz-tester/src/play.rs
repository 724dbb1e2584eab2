//! Scripted play: drive one session from a string of single-letter commands.
use colored::Colorize;
use rizz_game::{DisplayToken, GameSession, TapOutcome};
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCommand {
    Tap,
    Bank,
    GiveUp,
    Wait,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayScriptError {
    #[error("unknown play command `{command}` at position {position} (use t, b, g, w)")]
    UnknownCommand { command: char, position: usize },
}

/// Parse a script like `tttwbtg`. Whitespace and commas are ignored.
///
/// # Errors
///
/// Returns the first character that is not a known command.
pub fn parse_script(script: &str) -> Result<Vec<PlayCommand>, PlayScriptError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace() && *c != ',')
        .map(|(position, command)| match command.to_ascii_lowercase() {
            't' => Ok(PlayCommand::Tap),
            'b' => Ok(PlayCommand::Bank),
            'g' => Ok(PlayCommand::GiveUp),
            'w' => Ok(PlayCommand::Wait),
            _ => Err(PlayScriptError::UnknownCommand { command, position }),
        })
        .collect()
}

/// Outcome counters for a finished script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayTally {
    pub taps: usize,
    pub ignored_taps: usize,
    pub banks: usize,
    pub give_ups: usize,
}

/// Run `commands` against `session`, narrating each step to `out`.
///
/// A tap leaves the card on screen until a `w` lets the display elapse, so
/// `tt` sends the second tap into a shown card and it is ignored.
pub fn run_script<W: Write + ?Sized>(
    session: &mut GameSession,
    commands: &[PlayCommand],
    out: &mut W,
) -> std::io::Result<PlayTally> {
    let mut tally = PlayTally::default();
    let mut pending: Option<DisplayToken> = None;

    for command in commands {
        match command {
            PlayCommand::Tap => match session.tap() {
                Some(outcome) => {
                    tally.taps += 1;
                    pending = Some(outcome.display_token);
                    narrate_tap(out, &outcome)?;
                }
                None => {
                    tally.ignored_taps += 1;
                    writeln!(out, "   {}", "(card still showing, tap ignored)".dimmed())?;
                }
            },
            PlayCommand::Wait => {
                if let Some(token) = pending.take() {
                    session.finish_display(token);
                }
            }
            PlayCommand::Bank => {
                tally.banks += 1;
                pending = None;
                let bank = session.bank();
                let banner = if bank.new_record {
                    "🏆 NEW HIGH SCORE".bright_yellow().bold()
                } else {
                    "💰 Banked".green()
                };
                writeln!(
                    out,
                    "{banner} {} (high score {})",
                    bank.banked_score, bank.high_score
                )?;
            }
            PlayCommand::GiveUp => {
                tally.give_ups += 1;
                pending = None;
                let give_up = session.give_up();
                writeln!(
                    out,
                    "{} {} after {} taps",
                    "💀 Gave up".red(),
                    give_up.discarded_score,
                    give_up.taps
                )?;
            }
        }
    }

    let snapshot = session.snapshot();
    writeln!(
        out,
        "Final: rizz {} | taps {} | high score {}",
        snapshot.rizz_level, snapshot.click_count, snapshot.high_score
    )?;
    Ok(tally)
}

fn narrate_tap<W: Write + ?Sized>(out: &mut W, outcome: &TapOutcome) -> std::io::Result<()> {
    let name = if outcome.card.is_good {
        outcome.card.name.green()
    } else {
        outcome.card.name.red()
    };
    let attrs = outcome.attributes;
    writeln!(
        out,
        "#{:<3} {name} vibe {:+} swag {:+} cringe {:+} -> rizz {} ({} ms)",
        outcome.click_count,
        attrs.vibe_level,
        attrs.swagger,
        attrs.cringe_avoidance,
        outcome.rizz_level,
        outcome.display_ms
    )?;
    if let Some(event) = &outcome.special_event {
        writeln!(out, "   ✨ {}", event.message.bright_magenta())?;
    }
    Ok(())
}
