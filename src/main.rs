fn main() {
    if let Err(err) = llm_sampler::cli::main() {
        eprintln!("❌ Error: {err}");
        std::process::exit(1);
    }
}
