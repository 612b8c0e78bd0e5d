//! qrattend entrypoint.

use qrattend::errors::AppError;
use qrattend::run;
use qrattend::ui::messages::{error, hint};

fn main() {
    if let Err(e) = run() {
        error(&e);
        match &e {
            AppError::InvalidToken(_) | AppError::NoQrCode => {
                hint("Scan the code currently shown by the teacher and try again.")
            }
            e if e.is_store_failure() => hint("The attendance store is unavailable, please try again."),
            _ => {}
        }
        std::process::exit(e.exit_code());
    }
}
