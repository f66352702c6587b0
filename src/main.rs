use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

use pacman_pursuit::{
    CellKind, Config, Direction, GhostId, Grid, Position, Simulation, Snapshot, Spawns,
    TickOutcome,
};

const CELL_W: usize = 2;
const INPUT_HOLD_MS: u64 = 160;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Ghost(GhostId),
    Scared,
    Wall,
    Empty,
    Pellet,
    Power,
}

struct Renderer {
    last: Vec<Glyph>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![Glyph::Empty; width * height],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

/// Most recent time each direction key was seen, for held-key detection.
struct HeldKeys {
    last_seen: [Option<Instant>; 4],
    last_pressed: Option<Direction>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env();
    let grid = match &config.maze_path {
        Some(path) => {
            Grid::load(path).with_context(|| format!("loading maze {}", path.display()))?
        }
        None => Grid::classic(),
    };
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut sim = Simulation::new(grid, Spawns::default(), config.sim, rng)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &mut sim, &config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, sim: &mut Simulation<StdRng>, config: &Config) -> Result<()> {
    let (width, height) = (sim.grid().width(), sim.grid().height());
    let mut renderer = Renderer::new(width, height);
    let mut keys = HeldKeys {
        last_seen: [None; 4],
        last_pressed: None,
    };
    let tick_time = Duration::from_millis(config.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / config.render_fps.max(1));
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                let dir = match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Up | KeyCode::Char('k') => Direction::Up,
                    KeyCode::Down | KeyCode::Char('j') => Direction::Down,
                    KeyCode::Left | KeyCode::Char('h') => Direction::Left,
                    KeyCode::Right | KeyCode::Char('l') => Direction::Right,
                    _ => continue,
                };
                keys.last_seen[idx_for_dir(dir)] = Some(Instant::now());
                keys.last_pressed = Some(dir);
            }
        }

        if last_tick.elapsed() >= tick_time {
            last_tick = Instant::now();
            if let Some(dir) = active_dir_recent(&keys) {
                sim.set_intent(dir);
            }
            let outcome = sim.tick();
            render(stdout, &sim.snapshot(), &mut renderer)?;
            if let TickOutcome::GameOver { final_score } = outcome {
                if !render_game_over(stdout, height, width, final_score)? {
                    return Ok(());
                }
                sim.restart();
                keys.last_pressed = None;
                renderer.needs_full = true;
                stdout.queue(Clear(ClearType::All))?;
            }
        } else {
            render(stdout, &sim.snapshot(), &mut renderer)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn render(stdout: &mut Stdout, snap: &Snapshot<'_>, renderer: &mut Renderer) -> io::Result<()> {
    let height = snap.cells.len();
    let width = snap.cells.first().map_or(0, Vec::len);
    let needed_h = (height + 2) as u16;
    let needed_w = (width * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let scare = snap.ghosts.iter().map(|g| g.scare_ticks).max().unwrap_or(0);
    let hud = format!(
        "Score: {}  Pellets: {}  Scared: {}  (q to quit)",
        snap.score, snap.pellets_remaining, scare
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..height {
        for x in 0..width {
            let glyph = glyph_for(snap, x, y);
            let idx = y * width + x;
            if renderer.needs_full || glyph != renderer.last[idx] {
                renderer.last[idx] = glyph;
                draw_cell(stdout, renderer, x, y, glyph)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

// Agents move in sub-cell steps; draw each one on the cell it mostly covers.
fn nearest_cell(pos: Position, cell_size: i32) -> (usize, usize) {
    let half = cell_size / 2;
    (
        ((pos.x + half) / cell_size).max(0) as usize,
        ((pos.y + half) / cell_size).max(0) as usize,
    )
}

fn glyph_for(snap: &Snapshot<'_>, x: usize, y: usize) -> Glyph {
    if nearest_cell(snap.player.position, snap.cell_size) == (x, y) {
        return Glyph::Player;
    }
    if let Some(ghost) = snap
        .ghosts
        .iter()
        .find(|g| nearest_cell(g.position, snap.cell_size) == (x, y))
    {
        return if ghost.scared {
            Glyph::Scared
        } else {
            Glyph::Ghost(ghost.id)
        };
    }
    match snap.cells[y][x] {
        CellKind::Wall => Glyph::Wall,
        CellKind::Empty => Glyph::Empty,
        CellKind::Pellet => Glyph::Pellet,
        CellKind::PowerPellet => Glyph::Power,
    }
}

fn ghost_color(id: GhostId) -> Color {
    match id {
        GhostId::Blinky => Color::Red,
        GhostId::Pinky => Color::Magenta,
        GhostId::Inky => Color::Cyan,
        GhostId::Clyde => Color::DarkYellow,
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, glyph: Glyph) -> io::Result<()> {
    let (text, color) = match glyph {
        Glyph::Player => ("😃", Color::Yellow),
        Glyph::Ghost(id) => ("👻", ghost_color(id)),
        Glyph::Scared => ("😱", Color::Blue),
        Glyph::Wall => ("██", Color::Blue),
        Glyph::Empty => ("  ", Color::Reset),
        Glyph::Pellet => ("· ", Color::White),
        Glyph::Power => ("● ", Color::White),
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

/// Shows the final score and blocks until the player restarts (`true`) or
/// quits (`false`).
fn render_game_over(stdout: &mut Stdout, height: usize, width: usize, final_score: u32) -> io::Result<bool> {
    let (term_w, term_h) = terminal::size()?;
    let needed_h = (height + 2) as u16;
    let needed_w = (width * CELL_W) as u16;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(MoveTo(0, needed_h))?;
    } else {
        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        stdout.queue(MoveTo(origin_x, origin_y + height as u16))?;
    }
    stdout.queue(Print(format!(
        "GAME OVER - Final Score: {} (r to restart, q to quit)",
        final_score
    )))?;
    stdout.flush()?;
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('r') | KeyCode::Enter => return Ok(true),
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
                    _ => {}
                }
            }
        }
    }
}

fn active_dir_recent(keys: &HeldKeys) -> Option<Direction> {
    let now = Instant::now();
    let hold = Duration::from_millis(INPUT_HOLD_MS);
    if let Some(dir) = keys.last_pressed {
        if let Some(t) = keys.last_seen[idx_for_dir(dir)] {
            if now.duration_since(t) <= hold {
                return Some(dir);
            }
        }
    }
    let mut best: Option<(Direction, Instant)> = None;
    for (idx, dir) in Direction::ALL.iter().enumerate() {
        if let Some(t) = keys.last_seen[idx] {
            if now.duration_since(t) <= hold {
                match best {
                    None => best = Some((*dir, t)),
                    Some((_, bt)) if t > bt => best = Some((*dir, t)),
                    _ => {}
                }
            }
        }
    }
    best.map(|(dir, _)| dir)
}

fn idx_for_dir(dir: Direction) -> usize {
    match dir {
        Direction::Up | Direction::None => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}
