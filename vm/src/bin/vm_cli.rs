use vm_lib::io::StdConsole;
use vm_lib::{StopReason, Vm};

use common::asm::Reg;

use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::error;


/// Runs a program image on the 15-bit word virtual machine
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Program image: flat little-endian 16-bit words
    #[arg(default_value = "challenge.bin")]
    bin: String,

    /// Read IN characters from this file instead of stdin
    #[arg(long)]
    input: Option<String>,

    /// Print ip, registers and stack depth to stderr once the run stops
    #[arg(long)]
    dump_state: bool,
}


fn main() -> ExitCode {
    env_logger::init();

    let opt = Args::parse();

    let console = match &opt.input {
        Some(path) => match File::open(path) {
            Ok(file) => StdConsole::with_input(file),
            Err(e) => {
                error!("Unable to open input {path}: {e}");
                return ExitCode::FAILURE;
            },
        },
        None => StdConsole::new(),
    };

    let mut vm = Vm::new(Arc::new(console));
    if let Err(e) = vm.load_file(&opt.bin) {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let reason = vm.run();
    if let StopReason::Fault(fault) = reason {
        error!("{fault}");
    }

    if opt.dump_state {
        eprintln!("stopped: {reason:?}");
        eprintln!("ip:\t{}", vm.ip());
        for reg in Reg::ALL {
            eprintln!("{reg}:\t{}", vm.reg_read(reg));
        }
        eprintln!("stack:\t{}", vm.stack_depth());
        eprintln!("ins:\t{}", vm.num_ins());
    }

    ExitCode::SUCCESS
}
