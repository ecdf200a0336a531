mod fragment;
mod page;

pub use fragment::PositionedFragment;
pub use page::PageData;
