use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizcraft_core::grader::QuestionGrader;
use quizcraft_core::model::{AnswerValue, Question, QuestionBody};
use quizcraft_core::similarity;

const SAMPLE: &str = "Photosynthesis is important in Science because it provides foundational \
understanding and practical applications.";
const SUBMITTED: &str = "Photosynthesis matters because plants build sugars from light and it \
underpins practical applications in Science.";

fn bench_similarity_ratio(c: &mut Criterion) {
    c.bench_function("similarity_ratio", |b| {
        b.iter(|| similarity::ratio(black_box(SUBMITTED), black_box(SAMPLE)))
    });
}

fn bench_short_answer_grading(c: &mut Criterion) {
    let grader = QuestionGrader::new();
    let question = Question {
        question_id: "q_1".into(),
        prompt: "Explain the importance of Photosynthesis in Science.".into(),
        body: QuestionBody::ShortAnswer {
            sample_answer: SAMPLE.into(),
        },
        explanation: String::new(),
        points: 10,
    };
    let answer = AnswerValue::Text(SUBMITTED.into());

    c.bench_function("grade_short_answer", |b| {
        b.iter(|| grader.grade(black_box(&question), black_box(Some(&answer))))
    });
}

criterion_group!(benches, bench_similarity_ratio, bench_short_answer_grading);
criterion_main!(benches);
