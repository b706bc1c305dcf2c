fn main() -> anyhow::Result<()> {
    dv_cli::run()
}
