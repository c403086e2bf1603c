fn main() -> recolor::Result<()> {
    recolor::run(wild::args_os())
}
