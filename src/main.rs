use anyhow::Result;
use argh::FromArgs;
use fishyos::ShellSession;
use fishyos::console::StdConsole;

/// FishyOS, a playful MS-DOS style shell.
#[derive(FromArgs)]
struct Options {
    /// render error messages in color
    #[argh(switch)]
    ansi: bool,
}

fn main() -> Result<()> {
    let options: Options = argh::from_env();
    let mut console = StdConsole::new(options.ansi)?;
    ShellSession::new().run(&mut console)
}
