fn main() -> eframe::Result<()> {
    graph_viewer::native::run()
}
