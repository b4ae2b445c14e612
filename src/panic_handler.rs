/// Installs the panic hook for the command line tool.
///
/// Debug builds get `better_panic` backtraces. Release builds write a crash report
/// through `human_panic` instead of dumping a backtrace on the user.
pub fn initialize_panic_handler() {
    #[cfg(debug_assertions)]
    better_panic::install();

    #[cfg(not(debug_assertions))]
    human_panic::setup_panic!();
}
