use piihide::Pii;

#[derive(Pii)]
struct Address {
    #[pii]
    street: String,
}

#[derive(Pii)]
struct Person {
    #[pii]
    address: Address,
}

fn main() {}
