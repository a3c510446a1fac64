use std::process::ExitCode;

fn main() -> ExitCode {
    match devinit::run_cli() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            let code = e
                .downcast_ref::<devinit::InitError>()
                .map(devinit::InitError::exit_code)
                .unwrap_or(1);
            ExitCode::from(devinit::exit_byte(Some(code)))
        }
    }
}
