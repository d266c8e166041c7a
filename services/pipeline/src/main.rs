use career_pipeline::run;

fn main() {
    if let Err(err) = run() {
        eprintln!("career pipeline error: {err}");
        std::process::exit(1);
    }
}
