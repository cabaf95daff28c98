fn main() -> anyhow::Result<()> {
    wersig::run()
}
