fn main() {
    // Embeds crate/build metadata (version, git hash, profile) into a
    // generated `built.rs`, reported by `--debug` logs and `--help` output.
    built::write_built_file().expect("Failed to acquire build-time information");
}
