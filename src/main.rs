use std::fs::File;
use std::process;

use getopts::Options;
use log::info;

use chip8_tui::display::MonoTermDisplay;
use chip8_tui::error::{Error, LoadError};
use chip8_tui::input::TermInput;
use chip8_tui::interpreter::{Chip8Interpreter, Halt};
use chip8_tui::sound::{Mute, SimpleBeep, Sound};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;

fn run(rom_path: &str, mute: bool) -> Result<Halt, Error> {
    let mut file = File::open(rom_path).map_err(LoadError::Unreadable)?;

    // the display's size check runs before the input takes the terminal raw
    let mut display = MonoTermDisplay::new()?;
    let mut input = TermInput::new()?;
    let mut sound: Box<dyn Sound> = if mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let mut interpreter = Chip8Interpreter::new(&mut display, &mut input, &mut *sound);
    interpreter.load_program(&mut file)?;
    interpreter.run()
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut opts = Options::new();
    opts.optflag("m", "mute", "run without the buzzer");
    opts.optflag("h", "help", "print this help");
    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(EXIT_FAILURE);
        }
    };
    let usage = opts.usage(&format!("Usage: {} [options] ROM", args[0]));
    if matches.opt_present("h") {
        println!("{}", usage);
        process::exit(EXIT_SUCCESS);
    }
    let rom_path = match matches.free.first() {
        Some(path) => path,
        None => {
            eprintln!("{}", usage);
            process::exit(EXIT_FAILURE);
        }
    };

    let code = match run(rom_path, matches.opt_present("m")) {
        Ok(halt) => {
            // shove some newlines at the frame so the shell prompt lands
            // below it rather than on it
            for _ in 0..12 {
                println!();
            }
            match halt {
                Halt::Fault(fault) => {
                    eprintln!("fatal: {}", fault);
                    EXIT_FAILURE
                }
                Halt::ProgramEnded | Halt::UserQuit => {
                    info!("halted: {}", halt);
                    EXIT_SUCCESS
                }
            }
        }
        Err(err) => {
            eprintln!("error: {}", err);
            EXIT_FAILURE
        }
    };
    process::exit(code);
}
