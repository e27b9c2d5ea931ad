/// closed-form concentration profiles of the consecutive reactions of an antacid tablet
/// (calcium carbonate -> intermediate -> calcium chloride)
pub mod rate_of_reaction;
