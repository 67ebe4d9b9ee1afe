use threadforth::runtime::{built_ins, interpreter::vm::Vm};

/// Runs the outer interpreter against stdin until it hits end of input.  An error mid-stream is
/// reported and the VM's stacks/compiler state are reset so the session can continue, matching
/// the reference driver: one bad line doesn't take down the whole REPL.
fn main() {
    env_logger::init();

    let mut vm = Vm::new();
    built_ins::register_all(&mut vm);
    vm.set_source(std::io::stdin());

    loop {
        match vm.run() {
            Ok(()) => break,
            Err(err) => {
                eprintln!("Error: {}\n", err);
                vm.reset_state();
            }
        }
    }
}
