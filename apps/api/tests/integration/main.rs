mod helpers;
mod test_health;
