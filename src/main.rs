fn main() -> anyhow::Result<()> {
    solbind::run()
}
