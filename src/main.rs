fn main() {
    ember::run();
}
