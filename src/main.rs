//! Binary entry point for the graphfold command line tool.

fn main() {
    graphfold::main();
}
