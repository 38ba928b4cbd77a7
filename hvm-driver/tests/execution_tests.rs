//! Translate VM programs and run them on the Hack simulator

use hvm_driver::{translate_sources, BootstrapMode, CodegenOptions, SourceUnit, TranslatorConfig};
use hvm_sim::constants::{
    ARG_ADDRESS, DEFAULT_STEP_LIMIT, LCL_ADDRESS, SP_ADDRESS, THAT_ADDRESS, THIS_ADDRESS,
};
use hvm_sim::Cpu;
use pretty_assertions::assert_eq;

fn config() -> TranslatorConfig {
    TranslatorConfig {
        bootstrap: BootstrapMode::Never,
        codegen: CodegenOptions::default(),
    }
}

/// Load translated units with the conventional test frame: stack at 256,
/// LCL 300, ARG 400, THIS 3000, THAT 3010
fn load(units: &[(&str, &str)]) -> Cpu {
    let units: Vec<SourceUnit> = units.iter().map(|(name, text)| SourceUnit::new(name, text)).collect();
    let asm = translate_sources(&units, &config()).unwrap();
    let mut cpu = Cpu::from_source(&asm).unwrap();
    cpu.ram[SP_ADDRESS as usize] = 256;
    cpu.ram[LCL_ADDRESS as usize] = 300;
    cpu.ram[ARG_ADDRESS as usize] = 400;
    cpu.ram[THIS_ADDRESS as usize] = 3000;
    cpu.ram[THAT_ADDRESS as usize] = 3010;
    cpu
}

fn run(units: &[(&str, &str)]) -> Cpu {
    let mut cpu = load(units);
    cpu.run(DEFAULT_STEP_LIMIT).unwrap();
    cpu
}

fn signed_stack(cpu: &Cpu) -> Vec<i16> {
    cpu.stack().iter().map(|v| *v as i16).collect()
}

#[test]
fn test_add_into_local() {
    let cpu = run(&[("Main", "push constant 7\npush constant 8\nadd\npop local 0\n")]);
    assert_eq!(cpu.ram[300], 15);
    assert_eq!(cpu.ram[SP_ADDRESS as usize], 256);
}

#[test]
fn test_lt_of_small_constants() {
    let cpu = run(&[("Main", "push constant 5\npush constant 3\nlt\n")]);
    assert_eq!(signed_stack(&cpu), vec![0]);

    let cpu = run(&[("Main", "push constant 3\npush constant 5\nlt\n")]);
    assert_eq!(signed_stack(&cpu), vec![-1]);
}

#[test]
fn test_comparisons_exact_over_full_range() {
    let values = [i16::MIN, i16::MIN + 1, -2, -1, 0, 1, 2, i16::MAX - 1, i16::MAX];
    let relations: [(&str, fn(i16, i16) -> bool); 3] = [
        ("eq", |x, y| x == y),
        ("lt", |x, y| x < y),
        ("gt", |x, y| x > y),
    ];
    for (op, relation) in relations {
        for &x in &values {
            for &y in &values {
                let mut cpu = load(&[("Main", op)]);
                cpu.ram[256] = x as u16;
                cpu.ram[257] = y as u16;
                cpu.ram[SP_ADDRESS as usize] = 258;
                cpu.run(DEFAULT_STEP_LIMIT).unwrap();

                let expected = if relation(x, y) { -1 } else { 0 };
                assert_eq!(signed_stack(&cpu), vec![expected], "{} {} {}", x, op, y);
            }
        }
    }
}

#[test]
fn test_arithmetic_and_logic() {
    let cpu = run(&[(
        "Main",
        "push constant 10\npush constant 3\nsub\n\
         push constant 4\nneg\n\
         push constant 12\npush constant 10\nand\n\
         push constant 12\npush constant 3\nor\n\
         push constant 0\nnot\n",
    )]);
    assert_eq!(signed_stack(&cpu), vec![7, -4, 8, 15, -1]);
}

#[test]
fn test_shifts() {
    let cpu = run(&[("Main", "push constant 3\nshiftleft\npush constant 1\nneg\nshiftright\n")]);
    assert_eq!(signed_stack(&cpu), vec![6, -1]);

    let mut cpu = load(&[("Main", "shiftright\n")]);
    cpu.ram[256] = (-8i16) as u16;
    cpu.ram[SP_ADDRESS as usize] = 257;
    cpu.run(DEFAULT_STEP_LIMIT).unwrap();
    assert_eq!(signed_stack(&cpu), vec![-4]);
}

#[test]
fn test_push_then_pop_leaves_memory_unchanged() {
    let cases = [
        ("local", 0),
        ("local", 5),
        ("argument", 2),
        ("this", 7),
        ("that", 1),
        ("temp", 0),
        ("temp", 7),
        ("pointer", 0),
        ("pointer", 1),
        ("static", 0),
        ("static", 240),
    ];
    for (segment, index) in cases {
        let program = format!("push {0} {1}\npop {0} {1}\n", segment, index);
        let mut cpu = load(&[("Main", program.as_str())]);
        for (offset, cell) in cpu.ram[5..13].iter_mut().enumerate() {
            *cell = 500 + offset as u16;
        }
        for address in [300, 305, 402, 3007, 3011] {
            cpu.ram[address] = address as u16 * 3;
        }
        let before = cpu.ram[..13].to_vec();
        let targets = [cpu.ram[305], cpu.ram[402], cpu.ram[3007], cpu.ram[3011]];

        cpu.run(DEFAULT_STEP_LIMIT).unwrap();

        assert_eq!(&cpu.ram[..13], &before[..], "{} {}", segment, index);
        assert_eq!([cpu.ram[305], cpu.ram[402], cpu.ram[3007], cpu.ram[3011]], targets);
    }
}

#[test]
fn test_pop_then_push_round_trips_values() {
    let cases = [
        ("local", 3, 303),
        ("argument", 1, 401),
        ("this", 2, 3002),
        ("that", 9, 3019),
        ("temp", 6, 11),
        ("pointer", 1, 4),
    ];
    for (segment, index, address) in cases {
        let program = format!("push constant 1234\npop {0} {1}\npush {0} {1}\n", segment, index);
        let cpu = run(&[("Main", program.as_str())]);
        assert_eq!(cpu.ram[address], 1234, "{} {}", segment, index);
        assert_eq!(cpu.stack(), &[1234]);
    }
}

#[test]
fn test_statics_are_private_to_their_unit() {
    let cpu = run(&[
        ("A", "push constant 5\npop static 0\n"),
        ("B", "push constant 6\npop static 0\npush static 0\n"),
    ]);
    assert_eq!(cpu.symbol_value("A.0"), Some(5));
    assert_eq!(cpu.symbol_value("B.0"), Some(6));
    assert_eq!(cpu.stack(), &[6]);
}

#[test]
fn test_call_with_locals_returns_one_value() {
    let cpu = run(&[(
        "Main",
        "call Foo.bar 0\n\
         label END\n\
         goto END\n\
         function Foo.bar 2\n\
         push constant 0\n\
         push constant 0\n\
         return\n",
    )]);
    assert_eq!(cpu.ram[SP_ADDRESS as usize], 257);
    assert_eq!(signed_stack(&cpu), vec![0]);
}

#[test]
fn test_call_return_restores_caller_frame() {
    let cpu = run(&[(
        "Main",
        "push constant 10\n\
         push constant 20\n\
         push constant 30\n\
         call Math.sum3 3\n\
         label END\n\
         goto END\n\
         function Math.sum3 1\n\
         push constant 5555\n\
         pop pointer 0\n\
         push constant 6666\n\
         pop pointer 1\n\
         push argument 0\n\
         push argument 1\n\
         add\n\
         push argument 2\n\
         add\n\
         return\n",
    )]);
    assert_eq!(cpu.stack(), &[60]);
    assert_eq!(cpu.ram[LCL_ADDRESS as usize], 300);
    assert_eq!(cpu.ram[ARG_ADDRESS as usize], 400);
    assert_eq!(cpu.ram[THIS_ADDRESS as usize], 3000);
    assert_eq!(cpu.ram[THAT_ADDRESS as usize], 3010);
}

#[test]
fn test_recursive_calls() {
    let cpu = run(&[(
        "Main",
        "push constant 6\n\
         call Main.fib 1\n\
         label END\n\
         goto END\n\
         function Main.fib 0\n\
         push argument 0\n\
         push constant 2\n\
         lt\n\
         if-goto BASE\n\
         push argument 0\n\
         push constant 1\n\
         sub\n\
         call Main.fib 1\n\
         push argument 0\n\
         push constant 2\n\
         sub\n\
         call Main.fib 1\n\
         add\n\
         return\n\
         label BASE\n\
         push argument 0\n\
         return\n",
    )]);
    assert_eq!(cpu.stack(), &[8]);
}

#[test]
fn test_same_label_in_two_functions() {
    let cpu = run(&[
        ("A", "call A.f 0\ncall B.g 0\nadd\nlabel END\ngoto END\nfunction A.f 0\ngoto L\npush constant 99\nlabel L\npush constant 1\nreturn\n"),
        ("B", "function B.g 0\ngoto L\nlabel L\npush constant 2\nreturn\n"),
    ]);
    assert_eq!(cpu.stack(), &[3]);
}

#[test]
fn test_user_label_shaped_like_return_label() {
    let cpu = run(&[(
        "Main",
        "call Foo 0\n\
         label END\n\
         goto END\n\
         function Foo 0\n\
         label ret.0\n\
         push constant 1\n\
         return\n",
    )]);
    assert_eq!(cpu.stack(), &[1]);
}

#[test]
fn test_comparison_labels_unique_across_units() {
    let cpu = run(&[
        ("A", "push constant 1\npush constant 1\neq\n"),
        ("B", "push constant 2\npush constant 3\neq\n"),
    ]);
    assert_eq!(signed_stack(&cpu), vec![-1, 0]);
}

#[test]
fn test_if_goto_loop() {
    // sum of 1..=5 into local 0
    let cpu = run(&[(
        "Main",
        "push constant 5\n\
         pop local 1\n\
         label LOOP\n\
         push local 0\n\
         push local 1\n\
         add\n\
         pop local 0\n\
         push local 1\n\
         push constant 1\n\
         sub\n\
         pop local 1\n\
         push local 1\n\
         if-goto LOOP\n",
    )]);
    assert_eq!(cpu.ram[300], 15);
    assert!(cpu.stack().is_empty());
}
