use crate::app::{App, Command, Notice};
use crate::canvas::Canvas;
use crate::sprite::Color;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{self, Color as TermColor},
    terminal,
};
use log::info;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Default redraw rate.
pub const FRAME_RATE: u32 = 60;

/// Options for the terminal display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub fps: u32,
    /// Each canvas pixel is drawn `scale` cells wide and `scale` half-rows tall.
    pub scale: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        SurfaceConfig {
            fps: FRAME_RATE,
            scale: 1,
        }
    }
}

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Write `canvas` using upper half blocks: every terminal row shows two
/// canvas rows, the top one as foreground and the bottom one as background.
pub fn draw_canvas(out: &mut impl Write, canvas: &Canvas, scale: usize) -> io::Result<()> {
    let scale = scale.max(1);
    let width = canvas.width() * scale;
    let height = canvas.height() * scale;
    let sample = |x: usize, y: usize| canvas.pixel(x / scale, y / scale);

    queue!(out, cursor::MoveTo(0, 0))?;
    let mut prev: Option<(Color, Color)> = None;
    for row in 0..height.div_ceil(2) {
        for col in 0..width {
            let top = sample(col, row * 2);
            let bottom = if row * 2 + 1 < height {
                sample(col, row * 2 + 1)
            } else {
                Color::BLACK
            };
            if prev != Some((top, bottom)) {
                queue!(
                    out,
                    style::SetForegroundColor(term_color(top)),
                    style::SetBackgroundColor(term_color(bottom))
                )?;
                prev = Some((top, bottom));
            }
            queue!(out, style::Print('\u{2580}'))?; // ▀
        }
        queue!(out, style::ResetColor, style::Print("\r\n"))?;
        prev = None;
    }
    Ok(())
}

fn draw_notice(out: &mut impl Write, notice: Notice) -> io::Result<()> {
    queue!(
        out,
        style::SetAttribute(style::Attribute::Bold),
        style::Print(notice.title()),
        style::SetAttribute(style::Attribute::Reset),
        terminal::Clear(terminal::ClearType::UntilNewLine),
        style::Print("\r\n")
    )?;
    for line in notice.body().lines() {
        queue!(
            out,
            style::Print(line),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            style::Print("\r\n")
        )?;
    }
    queue!(
        out,
        style::Print("(press any key)"),
        terminal::Clear(terminal::ClearType::UntilNewLine)
    )
}

enum Input {
    Quit,
    Command(Command),
    Other,
}

fn translate(code: KeyCode) -> Input {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Input::Quit,
        KeyCode::Char(ch) => Command::from_char(ch).map_or(Input::Other, Input::Command),
        _ => Input::Other,
    }
}

/// Drive `app` until the player quits, then restore the terminal.
pub fn run(app: &mut App, config: SurfaceConfig) -> io::Result<()> {
    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    let result = execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap
    )
    .and_then(|()| event_loop(&mut out, app, config));

    restore(&mut out, result, terminal::disable_raw_mode)
}

/// Leave the alternate screen and raw mode. Raw mode is always disabled, even
/// when writing the reset sequence fails; the first error wins.
fn restore(
    out: &mut impl Write,
    result: io::Result<()>,
    disable_raw_mode: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let screen = execute!(
        out,
        style::ResetColor,
        terminal::EnableLineWrap,
        cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let raw = disable_raw_mode();
    result.and(screen).and(raw)
}

fn event_loop(out: &mut impl Write, app: &mut App, config: SurfaceConfig) -> io::Result<()> {
    let frame = Duration::from_secs(1) / config.fps.max(1);
    let mut notice = app.take_intro();
    let mut title = String::new();
    queue!(out, terminal::Clear(terminal::ClearType::All))?;

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let input = translate(key.code);
            if let Input::Quit = input {
                info!("quit requested");
                return Ok(());
            }
            // A pending notice swallows the key that dismisses it.
            if notice.take().is_some() {
                queue!(out, terminal::Clear(terminal::ClearType::All))?;
                continue;
            }
            if let Input::Command(command) = input {
                app.on_key(command);
            }
        }

        if notice.is_none() {
            notice = app.tick();
        }

        let new_title = app.title();
        if new_title != title {
            queue!(out, terminal::SetTitle(&new_title))?;
            title = new_title;
        }
        draw_canvas(out, app.canvas(), config.scale)?;
        if let Some(n) = notice {
            draw_notice(out, n)?;
        } else {
            queue!(out, terminal::Clear(terminal::ClearType::FromCursorDown))?;
        }
        out.flush()?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
}
