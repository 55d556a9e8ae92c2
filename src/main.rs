fn main() -> anyhow::Result<()> {
    frontctl::cli::run_cli()
}
