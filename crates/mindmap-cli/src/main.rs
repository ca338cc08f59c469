#![forbid(unsafe_code)]

fn main() {
    mindmap_cli::init_tracing();
    if let Err(error) = mindmap_cli::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
