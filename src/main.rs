mod application;
mod game_renderer;
mod keybinds_presets;
mod live_input_handler;
mod palette_presets;

use std::io;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Custom starting seed, given as a 64-bit integer.
    /// This fixes the sequence of pieces and makes it possible to replay
    /// a run with the same pieces if the same seed is entered.
    /// Example: `./gridfall_tui --seed=42` or `./gridfall_tui -s 42`.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Custom board dimensions in cells, given as `WIDTHxHEIGHT`.
    /// Example: `./gridfall_tui --board=12x24` or `./gridfall_tui -b 12x24`.
    #[arg(short, long)]
    board: Option<String>,
    /// Custom frame rate at which the game is run and rendered.
    #[arg(short, long)]
    fps: Option<f64>,
}

fn parse_board_dimensions(arg: &str) -> Option<(usize, usize)> {
    let (w, h) = arg.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Read commandline arguments.
    let args = Args::parse();

    let board_dimensions = match args.board.as_deref() {
        None => None,
        Some(arg) => match parse_board_dimensions(arg) {
            Some(dimensions) => Some(dimensions),
            None => {
                return Err(format!("invalid board dimensions {arg:?}, expected `WxH`").into());
            }
        },
    };

    // Initialize application.
    let stdout = io::BufWriter::new(io::stdout());
    let mut app = application::Application::new(stdout, args.seed, board_dimensions, args.fps);

    // Catch panics and write the error to stderr, so it isn't lost due to the
    // app's terminal shenanigans.
    std::panic::set_hook(Box::new(|panic_info| {
        // Forcefully reset terminal state.
        // Although `Application` restores it, it appears to sometimes not do so before we can
        // meaningfully print an error visible to the user.
        let _ = crossterm::terminal::disable_raw_mode();
        let _ =
            crossterm::ExecutableCommand::execute(&mut io::stderr(), crossterm::style::ResetColor);
        let _ = crossterm::ExecutableCommand::execute(&mut io::stderr(), crossterm::cursor::Show);
        let _ = crossterm::ExecutableCommand::execute(
            &mut io::stderr(),
            crossterm::terminal::LeaveAlternateScreen,
        );

        // Print the actual panic info.
        eprint!("{panic_info}\n\n");
    }));

    // Run main application.
    app.run()?;

    Ok(())
}
