//! CLI command implementations.

use forthkern_common::{Cell, Config, Primitive};
use forthkern_vm::{Console, Halt, Vm};
use tracing::debug;

/// Program name reported as argument 0.
const PROGRAM: &str = "forthkern";

/// Print the dictionary listing.
pub fn words(config: Config) -> Result<(), i32> {
    let mut vm = boot(config, vec![PROGRAM.to_string()])?;
    let xt = vm.primitive_xt(Primitive::Words);
    let result = vm.execute(xt);
    finish(&mut vm, result)
}

/// Interpret `tokens` left to right in a fresh session.
pub fn run(config: Config, tokens: &[String], args: &[String]) -> Result<(), i32> {
    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(PROGRAM.to_string());
    argv.extend(args.iter().cloned());
    let mut vm = boot(config, argv)?;

    for token in tokens {
        let result = match parse_number(token) {
            Some(value) => vm.push(value).map_err(Halt::from),
            None => match vm.find(token) {
                Some(xt) => {
                    debug!(token = token.as_str(), xt, "execute");
                    vm.execute(xt)
                }
                None => {
                    flush(&mut vm)?;
                    eprintln!("error: unknown word '{token}'");
                    return Err(1);
                }
            },
        };
        if result.is_err() {
            return finish(&mut vm, result);
        }
    }
    flush(&mut vm)
}

fn boot(config: Config, args: Vec<String>) -> Result<Vm, i32> {
    Vm::new(config, args, Console::stdio()).map_err(|e| {
        eprintln!("error: {e}");
        1
    })
}

/// Flush output and map how the session stopped to an exit code.
fn finish(vm: &mut Vm, result: Result<(), Halt>) -> Result<(), i32> {
    flush(vm)?;
    match result {
        Ok(()) | Err(Halt::Bye) => Ok(()),
        Err(Halt::Fault(fault)) => {
            eprintln!("fault: {fault}");
            Err(3)
        }
    }
}

fn flush(vm: &mut Vm) -> Result<(), i32> {
    vm.flush().map_err(|e| {
        eprintln!("fault: {e}");
        3
    })
}

/// Parse a decimal integer, signed or unsigned, into a cell.
fn parse_number(token: &str) -> Option<Cell> {
    token
        .parse::<i64>()
        .map(|n| n as Cell)
        .or_else(|_| token.parse::<Cell>())
        .ok()
}
