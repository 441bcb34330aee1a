//! Full-pipeline benchmark: lex, parse, analyse and emit a small program.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SOURCE: &str = "
    class Vector2 {
        int x;
        int y;
        Vector2(int px, int py) { this.x = px; this.y = py; }
        int lengthSquared() { return x * x + y * y; }
        Vector2 plus(Vector2 other) { return Vector2(x + other.x, y + other.y); }
    }

    int sum(int from, int to) {
        int total = 0;
        int i = from;
        while (i < to) {
            total = total + i;
            i = i + 1;
        }
        return total;
    }

    void main() {
        Vector2 v = Vector2(3, 4);
        writeIntLn(v.lengthSquared());
        writeIntLn(sum(0, 100));
    }
";

fn compile(c: &mut Criterion) {
    c.bench_function("compile_to_c", |b| {
        b.iter(|| {
            let output = co::compile_to_c(black_box(SOURCE));
            assert!(output.c_source.is_some());
            output
        })
    });
}

criterion_group!(benches, compile);
criterion_main!(benches);
