/// AppModuleBasic is the standard form for basic non-dependant elements of a contract module.
pub trait AppModuleBasic {
    /// Returns the module's name.
    fn name() -> String;

    /// Names of the functions the module answers to.
    fn functions() -> Vec<&'static str>;
}
