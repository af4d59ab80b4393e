//! Built-in level catalog.
//!
//! Applied at startup via an idempotent upsert keyed on level number, so the
//! shipped definitions refresh in place without touching admin-added levels.

use crate::domain::Difficulty;
use crate::domain::level::LevelSpec;

fn level(
    level_number: i64,
    title: &str,
    description: &str,
    category: &str,
    difficulty: Difficulty,
    xp_reward: i64,
    starter_code: &str,
    expected_output: &str,
    hints: &[&str],
    prerequisites: &[i64],
) -> LevelSpec {
    LevelSpec {
        level_number,
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        difficulty,
        xp_reward,
        starter_code: starter_code.to_string(),
        expected_output: expected_output.to_string(),
        hints: hints.iter().map(|h| h.to_string()).collect(),
        prerequisites: prerequisites.to_vec(),
        is_active: true,
    }
}

/// The shipped level set
pub fn seed_levels() -> Vec<LevelSpec> {
    vec![
        level(
            100,
            "Hello Python World!",
            "Write your first Python program that prints 'Hello, World!' to the console. \
             This is the traditional first program that every programmer writes!",
            "Python Basics",
            Difficulty::Easy,
            50,
            "# Welcome to Python! Type your code below\nprint(\"Hello, World!\")",
            "Hello, World!",
            &[
                "Use the print() function to display text",
                "Put your text inside quotes (either single ' or double \")",
                "Make sure the text matches exactly: Hello, World!",
            ],
            &[],
        ),
        level(
            101,
            "Variables and Numbers",
            "Learn to work with variables and perform basic arithmetic operations. \
             Create variables and calculate their sum!",
            "Python Basics",
            Difficulty::Easy,
            75,
            "# Create two variables and add them together\na = 15\nb = 25\n\n\
             # Calculate and print their sum\nresult = # Your code here\nprint(result)",
            "40",
            &[
                "Use the + operator to add numbers",
                "Store the result in a variable",
            ],
            &[100],
        ),
        level(
            102,
            "Working with Strings",
            "Manipulate text data using strings. Learn concatenation and basic string operations!",
            "Python Basics",
            Difficulty::Easy,
            75,
            "# String operations\nfirst_name = \"Python\"\nlast_name = \"Programmer\"\n\n\
             # Create a full name by combining first and last name\n\
             full_name = # Your code here\nprint(full_name)",
            "Python Programmer",
            &[
                "Use the + operator to join strings",
                "Don't forget the space between names",
            ],
            &[101],
        ),
        level(
            103,
            "Conditional Logic",
            "Make decisions in your code using if statements. \
             Check if a number is positive, negative, or zero!",
            "Control Flow",
            Difficulty::Medium,
            100,
            "# Conditional statements\nnumber = 42\n\n\
             # Check if number is positive, negative, or zero\n\
             if # Your condition here:\n    print(\"Positive\")\n# Add more conditions here",
            "Positive",
            &["Use if, elif, and else", "Compare using >, <, or =="],
            &[102],
        ),
        level(
            104,
            "Loops - Counting Fun",
            "Use loops to repeat actions. Print numbers from 1 to 5 using a for loop!",
            "Control Flow",
            Difficulty::Medium,
            125,
            "# For loops\n# Print numbers 1 through 5\nfor i in # Your code here:\n    print(i)",
            "1\n2\n3\n4\n5",
            &[
                "Use the range() function to generate numbers",
                "range(1, 6) gives numbers 1 to 5 (end is exclusive)",
                "Complete syntax: for i in range(1, 6):",
            ],
            &[103],
        ),
        level(
            105,
            "Build a Calculator",
            "Create a comprehensive calculator that can perform addition, subtraction, \
             multiplication, and division. Handle user input and provide a menu system.",
            "Comprehensive Project",
            Difficulty::Hard,
            200,
            "# Build a Calculator\n# Create functions for basic operations and a menu system\n\n\
             def add(x, y):\n    # Your code here\n    pass\n\n\
             def subtract(x, y):\n    # Your code here\n    pass\n\n\
             def multiply(x, y):\n    # Your code here\n    pass\n\n\
             def divide(x, y):\n    # Your code here\n    pass\n\n\
             # Main program\nprint(\"Calculator Menu:\")\nprint(\"1. Add\")\n\
             print(\"2. Subtract\")\nprint(\"3. Multiply\")\nprint(\"4. Divide\")\n\n\
             # Get user choice and numbers\n# Perform calculation and display result",
            "Calculator Menu:\n1. Add\n2. Subtract\n3. Multiply\n4. Divide",
            &[
                "Define each function to return the result of the operation",
                "Use input() to get user choices and numbers",
                "Convert string inputs to numbers using int() or float()",
                "Handle division by zero with an if statement",
                "Use if-elif-else to handle menu choices",
            ],
            &[104],
        ),
        level(
            200,
            "Data Analysis Basics",
            "Learn to work with data using Python lists. Calculate basic statistics like \
             mean, median, and mode from a dataset.",
            "Data Analysis",
            Difficulty::Medium,
            150,
            "# Data Analysis with Lists\ndata = [85, 92, 78, 96, 85, 88, 79, 92, 88, 84]\n\n\
             # Calculate mean\nmean = # Your code here\n\n\
             # Find maximum and minimum\nmax_value = # Your code here\n\
             min_value = # Your code here\n\n\
             # Print results\nprint(f\"Dataset: {data}\")\nprint(f\"Mean: {mean}\")\n\
             print(f\"Maximum: {max_value}\")\nprint(f\"Minimum: {min_value}\")",
            "Dataset: [85, 92, 78, 96, 85, 88, 79, 92, 88, 84]\nMean: 86.7\nMaximum: 96\nMinimum: 78",
            &[
                "Use sum(data) to add all numbers in the list",
                "Use len(data) to get the count of items",
                "Mean = sum / count",
                "Use max(data) and min(data) for maximum and minimum",
                "Round the mean to 1 decimal place",
            ],
            &[104],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_levels_are_well_formed() {
        let levels = seed_levels();
        assert_eq!(levels.len(), 7);

        // Level numbers are unique and rewards positive
        let mut numbers: Vec<i64> = levels.iter().map(|l| l.level_number).collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), levels.len());
        assert!(levels.iter().all(|l| l.xp_reward > 0));

        // Prerequisites only reference shipped level numbers
        for l in &levels {
            for p in &l.prerequisites {
                assert!(numbers.contains(p), "level {} requires unknown {}", l.level_number, p);
            }
        }
    }

    #[test]
    fn first_level_expects_hello_world() {
        let levels = seed_levels();
        let first = levels.iter().find(|l| l.level_number == 100).unwrap();
        assert_eq!(first.expected_output, "Hello, World!");
        assert_eq!(first.xp_reward, 50);
    }
}
