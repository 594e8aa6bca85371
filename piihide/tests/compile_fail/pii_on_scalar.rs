use piihide::Pii;

#[derive(Pii)]
struct Account {
    #[pii]
    balance: i64,
}

fn main() {}
