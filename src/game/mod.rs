//! Game protocols and the pieces they are built from.

pub mod division;
pub mod moves;
pub mod pair;
pub mod payoff;
pub mod round;
pub mod table;

pub use division::{DivisionGame, DivisionOutcome, DivisionVariant, PARSE_FAILED_MARKER};
pub use moves::{MoveParser, Split, parse_accept_reject, parse_discrete_move, parse_numeric_split};
pub use pair::{Pair, Side};
pub use payoff::{PayoffEntry, PayoffTable};
pub use round::RoundRecord;
pub use table::{EmotionFlags, RepeatedTableGame, TableRunSummary};
