pub mod controller;
pub mod list;

pub use controller::GoalListController;
pub use list::GoalList;
