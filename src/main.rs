//! almoco main entrypoint.

use almoco::run;
use almoco::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
