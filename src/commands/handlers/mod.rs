// One module per verb. Handlers return the lines owed to the sender;
// anything for other clients goes out through the registry.

pub mod join;
pub mod part;
pub mod ping;
pub mod privmsg;
pub mod welcome;

#[cfg(test)]
mod part_test;
#[cfg(test)]
mod test_support;
