use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examkit_core::parser::{parse_exam_str, validate_exam};

fn generate_exam_toml(questions: usize) -> String {
    let mut s = String::from(
        "[exam]\nid = \"bench\"\ntitle = \"Bench Exam\"\ntime_limit = 20\n",
    );
    for i in 0..questions {
        match i % 3 {
            0 => s.push_str(&format!(
                "\n[[questions]]\nid = \"q{i}\"\ntype = \"multiple-choice\"\nprompt = \"Question {i}?\"\noptions = [\"a{i}\", \"b{i}\", \"c{i}\"]\ncorrect_answer = \"b{i}\"\n"
            )),
            1 => s.push_str(&format!(
                "\n[[questions]]\nid = \"q{i}\"\ntype = \"checkbox\"\nprompt = \"Pick for {i}\"\noptions = [\"a\", \"b\", \"c\", \"d\"]\ncorrect_answers = [\"a\", \"c\"]\n"
            )),
            _ => s.push_str(&format!(
                "\n[[questions]]\nid = \"q{i}\"\ntype = \"text\"\nprompt = \"Name {i}\"\ncorrect_answer = \"Answer {i}\"\n"
            )),
        }
    }
    s
}

fn bench_exam_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("exam_parsing");
    let path = PathBuf::from("bench.toml");

    for size in [10, 100, 500] {
        let toml = generate_exam_toml(size);
        group.bench_function(format!("{size}_questions"), |b| {
            b.iter(|| parse_exam_str(black_box(&toml), &path, 30).unwrap())
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let exam = parse_exam_str(&generate_exam_toml(500), &PathBuf::from("bench.toml"), 30).unwrap();
    c.bench_function("validate_500_questions", |b| {
        b.iter(|| validate_exam(black_box(&exam)))
    });
}

criterion_group!(benches, bench_exam_parsing, bench_validation);
criterion_main!(benches);
