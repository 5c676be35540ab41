fn main() {
    if let Err(e) = pathology_desk_lib::run() {
        eprintln!("pathology-desk: {e}");
        std::process::exit(1);
    }
}
