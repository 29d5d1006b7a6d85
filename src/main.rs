fn main() -> anyhow::Result<()> {
    ai_prompt_history::cli::run()
}
