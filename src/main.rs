fn main() {
    if let Err(err) = matrix_graph_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
