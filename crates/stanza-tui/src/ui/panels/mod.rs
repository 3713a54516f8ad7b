pub(crate) mod detail;
pub(crate) mod recommendations;
pub(crate) mod searchline;
pub(crate) mod shelf;
pub(crate) mod sidebar;
pub(crate) mod statusbar;
