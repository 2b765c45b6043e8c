//! kiemke main entrypoint.

use kiemke::run;
use kiemke::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
