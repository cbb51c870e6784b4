//! Entity models and their operation builders.

pub mod account {
    pub use crate::account::*;
}

pub mod adgroup {
    pub use crate::adgroup::*;
}

pub mod campaign {
    pub use crate::campaign::*;
}

pub mod campaign_budget {
    pub use crate::campaign_budget::*;
}

pub mod extended_text_ad {
    pub use crate::extended_text_ad::*;
}

pub mod keyword {
    pub use crate::keyword::*;
}

pub mod label {
    pub use crate::label::*;
}

pub mod negative_keyword {
    pub use crate::negative_keyword::*;
}

pub mod shared_set {
    pub use crate::shared_set::*;
}
