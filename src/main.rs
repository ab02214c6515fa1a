//! Maze Memory entry point
//!
//! Native builds run a terminal front-end driven by the mouse. The browser
//! build is driven from JavaScript through `maze_memory::web`.

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::fs::File;
    use std::io::{self, Stdout, Write};
    use std::time::{Duration, Instant};

    use crossterm::cursor::{Hide, MoveTo, Show};
    use crossterm::event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    };
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
    use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
    use crossterm::{ExecutableCommand, QueueableCommand};
    use env_logger::{Builder, Env, Target};

    use maze_memory::Settings;
    use maze_memory::sim::{Cell, CellView, Coord, GameEvent, GamePhase, Session};

    /// Terminal columns per maze cell
    const CELL_W: u16 = 2;
    const ORIGIN_X: u16 = 2;
    const ORIGIN_Y: u16 = 2;
    const POLL_MS: u64 = 16;

    const PROMPT_START: &str = "Press s to start";
    const PROMPT_MEMORIZE: &str = "Memorize the maze, connect the two squares";

    /// Front-end state around the session
    struct Screen {
        session: Session,
        message: String,
        /// Last cell fed to the session, so repeated drag reports over one cell count once
        last_cell: Option<Coord>,
        needs_clear: bool,
    }

    impl Screen {
        fn apply(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::MazeGenerated { .. } => {
                        self.message = PROMPT_START.to_string();
                        self.needs_clear = true;
                    }
                    GameEvent::PreviewStarted { remaining }
                    | GameEvent::CountdownTick { remaining } => {
                        self.message = format!("{}  {}", PROMPT_MEMORIZE, remaining);
                    }
                    GameEvent::CountdownCancelled => {
                        self.message = format!("Preview cancelled. {}", PROMPT_START);
                    }
                    GameEvent::TracingStarted => {
                        self.message = "Trace from S to E, hold the left button".to_string();
                    }
                    GameEvent::CollectiblePicked { score, .. } => {
                        self.message = format!("Collected! Score {}", score);
                    }
                    GameEvent::LevelComplete { .. } => {
                        self.message = "Congratulations! Press n for the next level".to_string();
                    }
                    GameEvent::NewHighScore { high_score } => {
                        self.message.push_str(&format!("  New high score: {}", high_score));
                    }
                    GameEvent::GameOver { .. } => {
                        self.message = "Game Over. Press n to play again".to_string();
                    }
                    GameEvent::WallHit { .. } | GameEvent::CellVisited { .. } => {}
                }
            }
        }

        /// Apply a fallible transition, surfacing errors in the message line
        fn apply_result(&mut self, result: maze_memory::Result<Vec<GameEvent>>) {
            match result {
                Ok(events) => self.apply(&events),
                Err(e) => {
                    log::error!("{}", e);
                    self.message = format!("Error: {}", e);
                }
            }
        }

        fn enter_cell(&mut self, column: u16, row: u16) {
            let Some(at) = cell_at(column, row) else {
                return;
            };
            if self.last_cell == Some(at) {
                return;
            }
            let events = self.session.move_to(at.row, at.col);
            if !events.is_empty() {
                self.last_cell = Some(at);
            }
            self.apply(&events);
        }
    }

    pub fn run(settings: Settings, seed: u64) -> io::Result<()> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        stdout.execute(Hide)?;

        let result = game_loop(&mut stdout, settings, seed);

        stdout.execute(Show)?;
        stdout.execute(DisableMouseCapture)?;
        stdout.execute(LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        result
    }

    fn game_loop(stdout: &mut Stdout, settings: Settings, seed: u64) -> io::Result<()> {
        let tick = Duration::from_millis(settings.tick_ms);
        let session = Session::new(settings, seed).map_err(io::Error::other)?;
        let mut screen = Screen {
            session,
            message: PROMPT_START.to_string(),
            last_cell: None,
            needs_clear: true,
        };
        let mut last_tick = Instant::now();

        loop {
            let mut dirty = false;
            if event::poll(Duration::from_millis(POLL_MS))? {
                dirty = true;
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('s') | KeyCode::Char(' ') => {
                            last_tick = Instant::now();
                            let result = screen.session.start();
                            screen.apply_result(result);
                            screen.last_cell = None;
                        }
                        KeyCode::Char('n') | KeyCode::Char('r') => {
                            let result = screen.session.reset();
                            screen.apply_result(result);
                        }
                        KeyCode::Char('c') => {
                            let events = screen.session.cancel();
                            screen.apply(&events);
                        }
                        _ => {}
                    },
                    Event::Mouse(mouse) => match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            screen.session.press();
                            screen.last_cell = None;
                            screen.enter_cell(mouse.column, mouse.row);
                        }
                        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                            screen.enter_cell(mouse.column, mouse.row);
                        }
                        MouseEventKind::Up(MouseButton::Left) => screen.session.release(),
                        _ => {}
                    },
                    Event::Resize(..) => screen.needs_clear = true,
                    _ => {}
                }
            }

            if screen.session.phase() == GamePhase::Previewing && last_tick.elapsed() >= tick {
                last_tick = Instant::now();
                let events = screen.session.tick();
                screen.apply(&events);
                dirty = true;
            }

            if dirty || screen.needs_clear {
                render(stdout, &mut screen)?;
            }
        }
    }

    /// Maze cell under a terminal position, if any
    fn cell_at(column: u16, row: u16) -> Option<Coord> {
        let col = column.checked_sub(ORIGIN_X)? / CELL_W;
        let row = row.checked_sub(ORIGIN_Y)?;
        Some(Coord::new(row as usize, col as usize))
    }

    fn glyph(view: CellView) -> (&'static str, Color) {
        match view {
            CellView::Shown(Cell::Path) => ("░░", Color::Grey),
            CellView::Shown(Cell::Wall) => ("██", Color::DarkGrey),
            CellView::Shown(Cell::Collectible) => ("()", Color::Yellow),
            CellView::Shown(Cell::Start) => ("SS", Color::Cyan),
            CellView::Shown(Cell::End) => ("EE", Color::Magenta),
            CellView::Hidden => ("░░", Color::DarkGrey),
            CellView::Visited => ("██", Color::Green),
            CellView::Crashed => ("XX", Color::Red),
        }
    }

    fn render(stdout: &mut Stdout, screen: &mut Screen) -> io::Result<()> {
        if screen.needs_clear {
            stdout.queue(Clear(ClearType::All))?;
            screen.needs_clear = false;
        }

        let state = screen.session.state();
        stdout.queue(MoveTo(0, 0))?;
        stdout.queue(ResetColor)?;
        stdout.queue(Print(format!(
            "Level: {}  Score: {}  High Score: {}",
            state.level, state.score, state.high_score
        )))?;
        stdout.queue(Clear(ClearType::UntilNewLine))?;

        let board = screen.session.board();
        for (row, cells) in board.cells.iter().enumerate() {
            stdout.queue(MoveTo(ORIGIN_X, ORIGIN_Y + row as u16))?;
            for view in cells {
                let (text, color) = glyph(*view);
                stdout.queue(SetForegroundColor(color))?;
                stdout.queue(Print(text))?;
            }
        }
        stdout.queue(ResetColor)?;

        let below = ORIGIN_Y + board.size as u16 + 1;
        stdout.queue(MoveTo(0, below))?;
        stdout.queue(Print(&screen.message))?;
        stdout.queue(Clear(ClearType::UntilNewLine))?;
        stdout.queue(MoveTo(0, below + 1))?;
        stdout.queue(Print("s start  n next/again  c cancel preview  q quit"))?;
        stdout.queue(Clear(ClearType::UntilNewLine))?;

        stdout.flush()
    }

    /// Environment variable naming a file to receive the log
    pub const LOG_ENV: &str = "MAZE_MEMORY_LOG";

    /// Logger for the terminal front-end. The alternate screen owns stderr
    /// while the game runs, so records go to `log_file` or nowhere.
    pub fn logger(log_file: Option<File>) -> Builder {
        match log_file {
            Some(file) => {
                let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
                builder.target(Target::Pipe(Box::new(file)));
                builder
            }
            None => {
                let mut builder = Builder::new();
                builder.filter_level(log::LevelFilter::Off);
                builder
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use maze_memory::Settings;

    let log_file = match std::env::var(terminal::LOG_ENV) {
        Ok(path) => Some(std::fs::File::create(path)?),
        Err(_) => None,
    };
    terminal::logger(log_file).init();
    log::info!("Maze Memory (terminal) starting...");

    let settings = Settings::load().map_err(std::io::Error::other)?;
    let seed = Settings::seed_from_env().unwrap_or_else(rand::random);
    log::info!("Seed {}", seed);
    terminal::run(settings, seed)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is maze_memory::web::wasm_main
}
